use crate::{AppError, AppState, RequestContext};
use backend_domain::InventoryItemView;

pub async fn list_inventory(
    state: &AppState,
    ctx: &RequestContext,
    include_settled: bool,
) -> Result<Vec<InventoryItemView>, AppError> {
    let mut items = state
        .inventory
        .list_items(&ctx.account_id, include_settled)
        .await?;
    items.sort_by(|a, b| {
        b.drop_date
            .cmp(&a.drop_date)
            .then_with(|| b.item_id.as_str().cmp(a.item_id.as_str()))
    });
    Ok(items.iter().map(InventoryItemView::from).collect())
}
