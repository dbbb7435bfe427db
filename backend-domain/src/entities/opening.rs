// Opening entities
// Audit rows written per resolved draw, and the payload returned to the opener

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::entities::{CaseDrop, InventoryItemView};
use crate::value_objects::{Currency, Money};

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct OpeningRecordRow {
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub opened_at: OffsetDateTime,
    pub opening_id: String,
    pub account_id: String,
    pub case_id: String,
    pub price_cents: i64,
    pub currency: String,
    pub draw_space: u64,
    pub roll: u64,
    pub drop_id: String,
    pub item_id: String,
    pub partition_mode: String,
    pub partition_fingerprint: String,
    pub integrity_fallback: bool,
    pub receipt_signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelEntry {
    pub drop_id: String,
    pub weapon_name: String,
    pub skin_name: String,
    pub skin_rarity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_img_source: Option<String>,
}

impl From<&CaseDrop> for ReelEntry {
    fn from(drop: &CaseDrop) -> Self {
        Self {
            drop_id: drop.id.clone(),
            weapon_name: drop.weapon_name.clone(),
            skin_name: drop.skin_name.clone(),
            skin_rarity: drop.skin_rarity.clone(),
            skin_img_source: drop.skin_img_source.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OpeningResult {
    pub opening_id: String,
    pub case_id: String,
    pub roll: u64,
    pub draw_space: u64,
    pub item: InventoryItemView,
    pub reel: Vec<ReelEntry>,
    pub winning_position: usize,
    pub currency: Currency,
    pub balance_after: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_signature: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpeningVerification {
    pub opening_id: String,
    pub case_id: String,
    pub roll: u64,
    pub recorded_drop_id: String,
    pub recomputed_drop_id: Option<String>,
    pub fingerprint_matches: bool,
    pub drop_matches: bool,
    /// `None` when no receipt secret is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_valid: Option<bool>,
    pub verified: bool,
}
