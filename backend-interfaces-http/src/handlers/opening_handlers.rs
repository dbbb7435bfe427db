use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::opening_commands;
use backend_application::queries::opening_queries;
use backend_application::AppState;
use backend_domain::{OpeningQuery, OpeningRecordRow, OpeningResult, OpeningVerification};

use crate::error::HttpError;
use crate::middleware::{authorize_admin, require_session};

pub async fn open_case(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(url_name): Path<String>,
) -> Result<Json<OpeningResult>, HttpError> {
    let ctx = require_session(&state, &headers).await?;
    let result = opening_commands::open_case(&state, &ctx, &url_name).await?;
    Ok(Json(result))
}

pub async fn list_openings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OpeningQuery>,
) -> Result<Json<Vec<OpeningRecordRow>>, HttpError> {
    let ctx = require_session(&state, &headers).await?;
    let rows = opening_queries::list_openings(&state, &ctx, query.date, query.limit).await?;
    Ok(Json(rows))
}

pub async fn verify_opening(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(opening_id): Path<String>,
) -> Result<Json<OpeningVerification>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = opening_queries::verify_opening(&state, &opening_id).await?;
    Ok(Json(report))
}
