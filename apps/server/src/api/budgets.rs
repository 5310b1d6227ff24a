use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use fintrack_core::budgets::{
    Budget, BudgetComparison, BudgetFilters, BudgetOverview, BudgetUpdate, NewBudget,
};
use fintrack_core::types::Paginated;

use super::shared::{parse_sort, today};
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct BudgetListQuery {
    month: Option<i32>,
    year: Option<i32>,
    category_id: Option<String>,
    sort: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<BudgetListQuery>,
) -> ApiResult<Json<Paginated<Budget>>> {
    let filters = BudgetFilters {
        month: query.month,
        year: query.year,
        category_id: query.category_id,
        sort: parse_sort(query.sort),
        page: query.page,
        page_size: query.page_size,
    };
    Ok(Json(state.budget_service.list_budgets(&current.id, &filters)?))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(new_budget): Json<NewBudget>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let budget = state
        .budget_service
        .create_budget(current.id, new_budget)
        .await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

async fn get_budget(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Budget>> {
    Ok(Json(state.budget_service.get_budget(&current.id, &id)?))
}

async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(update): Json<BudgetUpdate>,
) -> ApiResult<Json<Budget>> {
    let budget = state
        .budget_service
        .update_budget(current.id, id, update)
        .await?;
    Ok(Json(budget))
}

async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let _ = state.budget_service.delete_budget(current.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(serde::Deserialize)]
struct PeriodQuery {
    month: Option<i32>,
    year: Option<i32>,
}

async fn current_budgets(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<BudgetOverview>> {
    Ok(Json(state.budget_service.current(
        &current.id,
        query.month,
        query.year,
        today(),
    )?))
}

async fn budget_comparison(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<BudgetComparison>> {
    Ok(Json(state.budget_service.comparison(
        &current.id,
        query.month,
        query.year,
        today(),
    )?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/current", get(current_budgets))
        .route("/budgets/comparison", get(budget_comparison))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}
