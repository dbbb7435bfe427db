use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::account_commands;
use backend_application::queries::account_queries;
use backend_application::AppState;
use backend_domain::{AccountView, AuthResponse, LoginRequest, RegisterRequest};

use crate::error::HttpError;
use crate::middleware::require_session;

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), HttpError> {
    let response = account_commands::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, HttpError> {
    let response = account_commands::login(&state, payload).await?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let ctx = require_session(&state, &headers).await?;
    account_commands::logout(&state, &ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_account(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AccountView>, HttpError> {
    let ctx = require_session(&state, &headers).await?;
    let account = account_queries::current_account(&state, &ctx).await?;
    Ok(Json(account))
}
