use std::cmp::Ordering;

use crate::{AppError, AppState};
use backend_domain::{validate_case, CaseDetail, CaseSummary, OddsRow};

/// Non-expired cases in grid order; unpositioned cases trail, sorted by name.
pub async fn list_cases(state: &AppState) -> Result<Vec<CaseSummary>, AppError> {
    let catalog = state.catalog.read().await;
    let mut summaries = catalog
        .values()
        .filter(|case| !case.expired)
        .map(|case| {
            let openable = validate_case(case, state.config.draw_space).is_ok();
            CaseSummary::from_case(case, openable)
        })
        .collect::<Vec<_>>();
    summaries.sort_by(compare_grid_order);
    Ok(summaries)
}

pub async fn get_case(state: &AppState, url_name: &str) -> Result<CaseDetail, AppError> {
    let url_name = url_name.trim().to_lowercase();
    let case = {
        let catalog = state.catalog.read().await;
        catalog.get(&url_name).cloned()
    };
    let case = case
        .filter(|case| !case.expired)
        .ok_or_else(|| AppError::NotFound(format!("case '{}'", url_name)))?;

    let detail = match validate_case(&case, state.config.draw_space) {
        Ok(table) => CaseDetail {
            case: CaseSummary::from_case(&case, true),
            draw_space: Some(table.draw_space()),
            partition_mode: Some(table.mode()),
            odds: table
                .entries()
                .iter()
                .map(|entry| OddsRow::from_entry(&table, entry))
                .collect(),
            invalid_reason: None,
        },
        Err(err) => CaseDetail {
            case: CaseSummary::from_case(&case, false),
            draw_space: None,
            partition_mode: None,
            odds: Vec::new(),
            invalid_reason: Some(err.to_string()),
        },
    };
    Ok(detail)
}

fn compare_grid_order(a: &CaseSummary, b: &CaseSummary) -> Ordering {
    match (a.position_in_grid, b.position_in_grid) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.website_name.cmp(&b.website_name))
    .then_with(|| a.url_name.cmp(&b.url_name))
}
