use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

use crate::receipt::sign_receipt;
use crate::{AppError, AppState, RequestContext};
use backend_domain::{
    current_millis, draw, generate_display_sequence, millis_to_utc,
    InventoryItem, InventoryItemView, OpeningAttempt, OpeningRecordRow, OpeningResult, ReelEntry,
    RngSource, validate_case,
};

pub async fn open_case(
    state: &AppState,
    ctx: &RequestContext,
    url_name: &str,
) -> Result<OpeningResult, AppError> {
    let url_name = url_name.trim().to_lowercase();
    let case = {
        let catalog = state.catalog.read().await;
        catalog.get(&url_name).cloned()
    };
    let case = case.ok_or_else(|| AppError::NotFound(format!("case '{}'", url_name)))?;
    if case.expired {
        return Err(AppError::BadRequest(format!(
            "case '{}' is no longer available",
            url_name
        )));
    }

    let table = validate_case(&case, state.config.draw_space).map_err(|err| {
        state.metrics.record_invalid_case();
        warn!("refused to open case '{}': {}", url_name, err);
        AppError::from(err)
    })?;

    let currency = case.currency();
    let account = state.accounts.get_account(&ctx.account_id).await?;
    let mut attempt = OpeningAttempt::new(&case.url_name, case.price);
    if let Err(err) = attempt.begin_drawing(account.balance_in(currency)) {
        state.metrics.record_opening_rejected();
        info!(
            "account {} cannot open '{}': {}",
            ctx.account_id,
            attempt.case_id(),
            err
        );
        return Err(err.into());
    }
    let debited = state
        .accounts
        .debit(&ctx.account_id, currency, attempt.price())
        .await
        .map_err(|err| {
            state.metrics.record_opening_rejected();
            AppError::from(err)
        })?;

    let mut source = RngSource::new(StdRng::from_entropy());
    let outcome = attempt.resolve(draw(&table, &mut source))?.clone();
    if let Some(warning) = &outcome.integrity {
        state.metrics.record_integrity_fallback();
        warn!("case '{}': {}", url_name, warning);
    }

    let opening_id = uuid::Uuid::new_v4().to_string();
    let opened_at = current_millis();
    let item = InventoryItem::new(
        ctx.account_id.clone(),
        &outcome.drop,
        &case.url_name,
        &opening_id,
        opened_at,
    );
    if let Err(err) = state.inventory.insert_item(item.clone()).await {
        error!(
            "failed to store item for opening {}, refunding {}: {}",
            opening_id,
            attempt.price(),
            err
        );
        if let Err(refund_err) = state
            .accounts
            .credit(&ctx.account_id, currency, attempt.price())
            .await
        {
            error!(
                "refund of {} to account {} failed: {}",
                attempt.price(),
                ctx.account_id,
                refund_err
            );
        }
        return Err(err.into());
    }

    let mut record = OpeningRecordRow {
        opened_at: millis_to_utc(opened_at),
        opening_id: opening_id.clone(),
        account_id: ctx.account_id.to_string(),
        case_id: case.url_name.clone(),
        price_cents: attempt.price().cents(),
        currency: currency.as_str().to_string(),
        draw_space: table.draw_space(),
        roll: outcome.roll,
        drop_id: outcome.drop.id.clone(),
        item_id: item.item_id.to_string(),
        partition_mode: table.mode().as_str().to_string(),
        partition_fingerprint: table.fingerprint(),
        integrity_fallback: outcome.integrity.is_some(),
        receipt_signature: String::new(),
    };
    let receipt_signature = match state.config.receipt_secret.as_deref() {
        Some(secret) => Some(sign_receipt(secret, &record)?),
        None => None,
    };
    record.receipt_signature = receipt_signature.clone().unwrap_or_default();
    if let Err(err) = state.opening_audit.insert_opening(&record).await {
        state.metrics.record_audit_error();
        error!("failed to append audit record for opening {}: {}", opening_id, err);
    }

    let catalog = table
        .entries()
        .iter()
        .map(|entry| ReelEntry::from(&entry.drop))
        .collect::<Vec<_>>();
    let reel = generate_display_sequence(
        &catalog,
        &ReelEntry::from(&outcome.drop),
        state.config.reel_length,
        state.config.reel_winning_position,
        &mut source,
    )?;

    state.metrics.record_opening();
    info!(
        "account {} opened '{}' (roll {}/{}) and won '{}'",
        ctx.account_id,
        case.url_name,
        outcome.roll,
        table.draw_space(),
        outcome.drop.display_name()
    );

    Ok(OpeningResult {
        opening_id,
        case_id: case.url_name,
        roll: outcome.roll,
        draw_space: table.draw_space(),
        item: InventoryItemView::from(&item),
        reel,
        winning_position: state.config.reel_winning_position,
        currency,
        balance_after: debited.balance_in(currency),
        receipt_signature,
    })
}
