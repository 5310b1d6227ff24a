//! HTTP API: one router per domain, nested under `/api`.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod shared;
pub mod transactions;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::main_lib::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FinTrack API",
        description = "Personal finance tracking backend: categories, transactions, and monthly budgets with spend-vs-budget reporting."
    ),
    components(schemas(
        crate::models::RegisterRequest,
        crate::models::LoginRequest,
        crate::models::RefreshRequest,
        crate::models::AccessTokenResponse,
        crate::auth::TokenPair,
    )),
    tags(
        (name = "auth", description = "Registration, login, and profile"),
        (name = "categories", description = "Income/expense categories"),
        (name = "transactions", description = "Dated monetary events"),
        (name = "budgets", description = "Monthly allocations and reports"),
    )
)]
struct ApiDoc;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn fallback() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(auth::protected_router())
        .merge(categories::router())
        .merge(transactions::router())
        .merge(budgets::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ));

    let public = Router::new()
        .merge(auth::public_router())
        .route("/health", get(health))
        .route("/docs/openapi.json", get(openapi_json));

    Router::new()
        .nest("/api", public.merge(protected))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
