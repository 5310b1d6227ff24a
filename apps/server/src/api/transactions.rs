use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;

use fintrack_core::transactions::{
    NewTransaction, Transaction, TransactionFilters, TransactionSummary, TransactionUpdate,
};
use fintrack_core::types::{FlowKind, Paginated};

use super::shared::{parse_date_optional, parse_sort, today};
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionListQuery {
    kind: Option<FlowKind>,
    category_id: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
    search: Option<String>,
    sort: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<TransactionListQuery>,
) -> ApiResult<Json<Paginated<Transaction>>> {
    let filters = TransactionFilters {
        kind: query.kind,
        category_id: query.category_id,
        start_date: parse_date_optional(query.start_date, "startDate")?,
        end_date: parse_date_optional(query.end_date, "endDate")?,
        min_amount: query.min_amount,
        max_amount: query.max_amount,
        search: query.search,
        sort: parse_sort(query.sort),
        page: query.page,
        page_size: query.page_size,
    };
    Ok(Json(
        state
            .transaction_service
            .list_transactions(&current.id, &filters)?,
    ))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

async fn transaction_summary(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<TransactionSummary>> {
    let start_date = parse_date_optional(query.start_date, "startDate")?;
    let end_date = parse_date_optional(query.end_date, "endDate")?;
    Ok(Json(state.transaction_service.summary(
        &current.id,
        start_date,
        end_date,
        today(),
    )?))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(new_transaction): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let transaction = state
        .transaction_service
        .create_transaction(current.id, new_transaction)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(
        state.transaction_service.get_transaction(&current.id, &id)?,
    ))
}

async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(update): Json<TransactionUpdate>,
) -> ApiResult<Json<Transaction>> {
    let transaction = state
        .transaction_service
        .update_transaction(current.id, id, update)
        .await?;
    Ok(Json(transaction))
}

async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let _ = state
        .transaction_service
        .delete_transaction(current.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/summary", get(transaction_summary))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}
