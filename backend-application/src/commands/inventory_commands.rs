use tracing::info;

use crate::{AppError, AppState, RequestContext};
use backend_domain::ports::Settlement;
use backend_domain::{AccountView, InventoryItemView, ItemId, ItemSettlementResponse};

/// Flags the item sold and credits its acquisition value, exactly once.
pub async fn sell_item(
    state: &AppState,
    ctx: &RequestContext,
    item_id: &str,
) -> Result<ItemSettlementResponse, AppError> {
    let response = settle(state, ctx, item_id, Settlement::Sell).await?;
    state.metrics.record_item_sold();
    info!(
        "account {} sold item {} for {}",
        ctx.account_id, response.item.item_id, response.credited
    );
    Ok(response)
}

/// Consumes the item; no balance changes hands.
pub async fn upgrade_item(
    state: &AppState,
    ctx: &RequestContext,
    item_id: &str,
) -> Result<ItemSettlementResponse, AppError> {
    let response = settle(state, ctx, item_id, Settlement::Upgrade).await?;
    state.metrics.record_item_upgraded();
    info!(
        "account {} consumed item {} in an upgrade",
        ctx.account_id, response.item.item_id
    );
    Ok(response)
}

async fn settle(
    state: &AppState,
    ctx: &RequestContext,
    item_id: &str,
    settlement: Settlement,
) -> Result<ItemSettlementResponse, AppError> {
    let item_id = item_id.trim();
    if item_id.is_empty() {
        return Err(AppError::BadRequest("item_id must not be empty".to_string()));
    }
    let receipt = state
        .inventory
        .settle_item(&ctx.account_id, &ItemId(item_id.to_string()), settlement)
        .await?;
    Ok(ItemSettlementResponse {
        item: InventoryItemView::from(&receipt.item),
        credited: receipt.credited,
        account: AccountView::from(&receipt.account),
    })
}
