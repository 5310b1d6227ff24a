use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use fintrack_core::errors::{Error, ValidationError};
use fintrack_core::users::{NewUser, User, UserUpdate};

use crate::auth::{AuthError, CurrentUser};
use crate::error::ApiResult;
use crate::main_lib::AppState;
use crate::models::{
    AccessTokenResponse, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest,
};

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if body.password.chars().count() < 8 {
        return Err(Error::Validation(ValidationError::field(
            "password",
            "must be at least 8 characters",
        ))
        .into());
    }
    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .user_service
        .register(NewUser {
            id: None,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            password_hash,
        })
        .await?;
    let tokens = state.auth.issue_tokens(&user.id)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, tokens })))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = body.email.trim().to_lowercase();
    let credentials = state
        .user_service
        .find_credentials(&email)?
        .filter(|c| state.auth.verify_password(&c.password_hash, &body.password))
        .ok_or(AuthError::InvalidCredentials)?;
    let tokens = state.auth.issue_tokens(&credentials.user.id)?;
    Ok(Json(AuthResponse {
        user: credentials.user,
        tokens,
    }))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let user_id = state.auth.verify_refresh(&body.refresh)?;
    // The account may have been deleted since the token was issued.
    let user = state
        .user_service
        .get_user(&user_id)
        .map_err(|_| AuthError::InvalidToken)?;
    let tokens = state.auth.issue_tokens(&user.id)?;
    Ok(Json(AccessTokenResponse {
        access: tokens.access,
    }))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.user_service.get_user(&current.id)?))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(update): Json<UserUpdate>,
) -> ApiResult<Json<User>> {
    let user = state
        .user_service
        .update_profile(current.id, update)
        .await?;
    Ok(Json(user))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/auth/profile",
        get(get_profile).put(update_profile).patch(update_profile),
    )
}
