use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use fintrack_core::categories::{Category, CategoryFilters, CategoryUpdate, NewCategory};
use fintrack_core::types::{FlowKind, Paginated};

use super::shared::parse_sort;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryListQuery {
    kind: Option<FlowKind>,
    is_active: Option<bool>,
    search: Option<String>,
    sort: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<CategoryListQuery>,
) -> ApiResult<Json<Paginated<Category>>> {
    let filters = CategoryFilters {
        kind: query.kind,
        is_active: query.is_active,
        search: query.search,
        sort: parse_sort(query.sort),
        page: query.page,
        page_size: query.page_size,
    };
    Ok(Json(
        state.category_service.list_categories(&current.id, &filters)?,
    ))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(new_category): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state
        .category_service
        .create_category(current.id, new_category)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.category_service.get_category(&current.id, &id)?))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(update): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    let category = state
        .category_service
        .update_category(current.id, id, update)
        .await?;
    Ok(Json(category))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let _ = state
        .category_service
        .delete_category(current.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .patch(update_category)
                .delete(delete_category),
        )
}
