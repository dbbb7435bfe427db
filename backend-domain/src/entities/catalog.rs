// Catalog views
// Case grid entries and the displayed probability/price table

use serde::Serialize;

use crate::entities::Case;
use crate::services::draw_engine::{PartitionEntry, PartitionMode, PartitionTable};
use crate::value_objects::Money;

#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub url_name: String,
    pub website_name: String,
    pub price: Money,
    pub golden_case: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_in_grid: Option<u32>,
    pub openable: bool,
}

impl CaseSummary {
    pub fn from_case(case: &Case, openable: bool) -> Self {
        Self {
            url_name: case.url_name.clone(),
            website_name: case.website_name.clone(),
            price: case.price,
            golden_case: case.golden_case,
            category: case.category.clone(),
            img_name: case.img_name.clone(),
            position_in_grid: case.position_in_grid,
            openable,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OddsRow {
    pub drop_id: String,
    pub global_inv_id: String,
    pub weapon_name: String,
    pub skin_name: String,
    pub skin_quality: String,
    pub skin_rarity: String,
    pub stattrak: bool,
    pub skin_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_img_source: Option<String>,
    pub lo: u64,
    pub hi: u64,
    pub weight: u64,
    pub probability: f64,
    pub display_chance: String,
}

impl OddsRow {
    pub fn from_entry(table: &PartitionTable, entry: &PartitionEntry) -> Self {
        let probability = table.probability(entry);
        Self {
            drop_id: entry.drop.id.clone(),
            global_inv_id: entry.drop.global_inv_id.clone(),
            weapon_name: entry.drop.weapon_name.clone(),
            skin_name: entry.drop.skin_name.clone(),
            skin_quality: entry.drop.skin_quality.clone(),
            skin_rarity: entry.drop.skin_rarity.clone(),
            stattrak: entry.drop.stattrak,
            skin_price: entry.drop.skin_price,
            skin_img_source: entry.drop.skin_img_source.clone(),
            lo: entry.lo,
            hi: entry.hi,
            weight: entry.weight(),
            probability,
            display_chance: format!("{:.3}%", probability * 100.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseDetail {
    pub case: CaseSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_space: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_mode: Option<PartitionMode>,
    pub odds: Vec<OddsRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
}
