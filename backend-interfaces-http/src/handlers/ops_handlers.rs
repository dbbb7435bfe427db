use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::AppState;

use crate::middleware::authorize;

#[derive(serde::Serialize)]
struct ReadyStatus {
    database: &'static str,
    catalog: &'static str,
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    let database = match timeout(timeout_duration, state.health.check_database()).await {
        Ok(Ok(true)) => "ok",
        Ok(Ok(false)) => "error",
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            "error"
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            "timeout"
        }
    };
    let catalog = match state.health.check_catalog().await {
        Ok(true) => "ok",
        Ok(false) => "empty",
        Err(err) => {
            error!("catalog check failed: {}", err);
            "error"
        }
    };
    let status = if database == "ok" && catalog == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyStatus { database, catalog }))
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
