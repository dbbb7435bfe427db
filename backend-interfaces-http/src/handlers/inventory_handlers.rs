use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::inventory_commands;
use backend_application::queries::inventory_queries;
use backend_application::AppState;
use backend_domain::{InventoryItemView, InventoryQuery, ItemSettlementResponse};

use crate::error::HttpError;
use crate::middleware::require_session;

pub async fn list_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Vec<InventoryItemView>>, HttpError> {
    let ctx = require_session(&state, &headers).await?;
    let items = inventory_queries::list_inventory(&state, &ctx, query.include_settled).await?;
    Ok(Json(items))
}

pub async fn sell_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
) -> Result<Json<ItemSettlementResponse>, HttpError> {
    let ctx = require_session(&state, &headers).await?;
    let response = inventory_commands::sell_item(&state, &ctx, &item_id).await?;
    Ok(Json(response))
}

pub async fn upgrade_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
) -> Result<Json<ItemSettlementResponse>, HttpError> {
    let ctx = require_session(&state, &headers).await?;
    let response = inventory_commands::upgrade_item(&state, &ctx, &item_id).await?;
    Ok(Json(response))
}
