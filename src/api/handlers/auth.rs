/*
 * Responsibility
 * - POST /auth/sign-up, POST /auth/log-in
 * - Json を受け、UserService に委譲して AuthResponse を返す
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::auth::{AuthCreateUserRequest, AuthLoginRequest, AuthResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<AuthCreateUserRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let result = state.users.create_user(req.into()).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

pub async fn log_in(
    State(state): State<AppState>,
    Json(req): Json<AuthLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let result = state.users.login_user(&req.username, &req.password).await?;
    Ok(Json(result.into()))
}
