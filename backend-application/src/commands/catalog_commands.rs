use std::collections::{HashMap, HashSet};

use tracing::{error, info, warn};

use crate::{AppError, AppState};
use backend_domain::{validate_case, Case, CaseSummary};

/// Validates and merges `cases` into the catalog, persists the whole catalog,
/// then swaps the in-memory copy. Nothing changes if any case is rejected.
pub async fn upsert_cases(state: &AppState, cases: Vec<Case>) -> Result<Vec<CaseSummary>, AppError> {
    if cases.is_empty() {
        return Err(AppError::BadRequest("cases must not be empty".to_string()));
    }

    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(cases.len());
    for case in cases {
        let case = case.normalized();
        if case.url_name.is_empty() {
            return Err(AppError::BadRequest("url_name must not be empty".to_string()));
        }
        if !seen.insert(case.url_name.clone()) {
            return Err(AppError::BadRequest(format!(
                "case '{}' appears more than once",
                case.url_name
            )));
        }
        let table = validate_case(&case, state.config.draw_space).map_err(|err| {
            warn!("rejected case '{}': {}", case.url_name, err);
            AppError::from(err)
        })?;
        if !table.gaps().is_empty() {
            warn!(
                "case '{}' leaves {} uncovered stretch(es) in the draw space",
                case.url_name,
                table.gaps().len()
            );
        }
        normalized.push(case);
    }

    let mut catalog = state.catalog.write().await;
    let mut merged = catalog.clone();
    for case in &normalized {
        merged.insert(case.url_name.clone(), case.clone());
    }
    let mut snapshot = merged.values().cloned().collect::<Vec<_>>();
    snapshot.sort_by(|a, b| a.url_name.cmp(&b.url_name));
    state
        .catalog_repo
        .save_catalog(&state.config.catalog_path, &snapshot)
        .await
        .map_err(|err| {
            error!("failed to persist case catalog: {}", err);
            AppError::Internal(err)
        })?;
    *catalog = merged;
    info!("catalog updated with {} case(s)", normalized.len());

    Ok(normalized
        .iter()
        .map(|case| CaseSummary::from_case(case, true))
        .collect())
}

/// Keys a freshly loaded catalog by url name. Cases that fail validation stay
/// listed but are refused by every open.
pub fn index_catalog(cases: Vec<Case>, draw_space: u64) -> HashMap<String, Case> {
    let mut catalog = HashMap::with_capacity(cases.len());
    for case in cases {
        let case = case.normalized();
        match validate_case(&case, draw_space) {
            Ok(table) if !table.gaps().is_empty() => warn!(
                "case '{}' leaves {} uncovered stretch(es) in the draw space",
                case.url_name,
                table.gaps().len()
            ),
            Ok(_) => {}
            Err(err) => warn!("case '{}' is not openable: {}", case.url_name, err),
        }
        catalog.insert(case.url_name.clone(), case);
    }
    catalog
}
