use axum::http::HeaderMap;

use backend_application::queries::session_queries;
use backend_application::{AppState, RequestContext};
use backend_domain::RuntimeConfig;

use crate::error::HttpError;

pub const SESSION_HEADER: &str = "X-Session-Token";

/// Operator endpoints: open when no `api_token` is configured.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Catalog writes and audit replays: always require the configured token.
pub fn authorize_admin(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    config.api_token.is_some() && authorize(config, headers)
}

pub async fn require_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<RequestContext, HttpError> {
    let token = extract_session_token(headers).ok_or(HttpError::Unauthorized)?;
    let ctx = session_queries::resolve_session(state, &token).await?;
    Ok(ctx)
}

pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(SESSION_HEADER)?.to_str().ok()?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
