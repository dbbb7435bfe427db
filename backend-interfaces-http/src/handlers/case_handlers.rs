use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::catalog_commands;
use backend_application::queries::catalog_queries;
use backend_application::AppState;
use backend_domain::{CaseCatalogPayload, CaseDetail, CaseSummary};

use crate::error::HttpError;
use crate::middleware::authorize_admin;

pub async fn list_cases(State(state): State<AppState>) -> Result<Json<Vec<CaseSummary>>, HttpError> {
    let cases = catalog_queries::list_cases(&state).await?;
    Ok(Json(cases))
}

pub async fn get_case(
    State(state): State<AppState>,
    Path(url_name): Path<String>,
) -> Result<Json<CaseDetail>, HttpError> {
    let detail = catalog_queries::get_case(&state, &url_name).await?;
    Ok(Json(detail))
}

pub async fn upsert_cases(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CaseCatalogPayload>,
) -> Result<Json<Vec<CaseSummary>>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let summaries = catalog_commands::upsert_cases(&state, payload.cases).await?;
    Ok(Json(summaries))
}
