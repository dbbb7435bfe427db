use chrono::{Local, NaiveDate};
use tracing::{error, warn};

use crate::receipt::verify_receipt;
use crate::{AppError, AppState, RequestContext};
use backend_domain::{build_partition, draw_with_roll, OpeningRecordRow, OpeningVerification};

const DEFAULT_OPENING_LIMIT: usize = 100;
const MAX_OPENING_LIMIT: usize = 1_000;

pub async fn list_openings(
    state: &AppState,
    ctx: &RequestContext,
    date: Option<String>,
    limit: Option<usize>,
) -> Result<Vec<OpeningRecordRow>, AppError> {
    let date = match date.map(|raw| raw.trim().to_string()).filter(|raw| !raw.is_empty()) {
        Some(raw) => {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("invalid date '{}'", raw)))?;
            raw
        }
        None => Local::now().format("%Y-%m-%d").to_string(),
    };
    let limit = limit
        .unwrap_or(DEFAULT_OPENING_LIMIT)
        .clamp(1, MAX_OPENING_LIMIT);

    let rows = state
        .opening_audit
        .fetch_openings(ctx.account_id.as_str(), &date, limit)
        .await
        .map_err(|err| {
            error!("failed to fetch openings: {}", err);
            AppError::Internal(err)
        })?;
    Ok(rows)
}

/// Replays a recorded roll against the current catalog definition of its case.
pub async fn verify_opening(
    state: &AppState,
    opening_id: &str,
) -> Result<OpeningVerification, AppError> {
    let opening_id = opening_id.trim();
    if opening_id.is_empty() {
        return Err(AppError::BadRequest("opening_id must not be empty".to_string()));
    }
    let record = state
        .opening_audit
        .fetch_opening(opening_id)
        .await
        .map_err(|err| {
            error!("failed to fetch opening {}: {}", opening_id, err);
            AppError::Internal(err)
        })?
        .ok_or_else(|| AppError::NotFound(format!("opening {}", opening_id)))?;

    let case = {
        let catalog = state.catalog.read().await;
        catalog.get(&record.case_id).cloned()
    };
    let (fingerprint_matches, recomputed_drop_id) = match case {
        Some(case) => match build_partition(&case.drops, state.config.draw_space) {
            Ok(table) => {
                let outcome = draw_with_roll(&table, record.roll);
                (
                    table.fingerprint() == record.partition_fingerprint,
                    Some(outcome.drop.id),
                )
            }
            Err(err) => {
                warn!("case '{}' no longer builds: {}", record.case_id, err);
                (false, None)
            }
        },
        None => (false, None),
    };
    let drop_matches = recomputed_drop_id.as_deref() == Some(record.drop_id.as_str());

    let signature_valid = match state.config.receipt_secret.as_deref() {
        Some(secret) => Some(verify_receipt(secret, &record)?),
        None => None,
    };
    let verified = fingerprint_matches && drop_matches && signature_valid.unwrap_or(true);
    if !verified {
        warn!("opening {} failed verification", record.opening_id);
    }

    Ok(OpeningVerification {
        opening_id: record.opening_id,
        case_id: record.case_id,
        roll: record.roll,
        recorded_drop_id: record.drop_id,
        recomputed_drop_id,
        fingerprint_matches,
        drop_matches,
        signature_valid,
        verified,
    })
}
