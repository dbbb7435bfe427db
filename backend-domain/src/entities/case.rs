// Case entity
// A purchasable loot-box definition and the drops it can yield

use serde::{Deserialize, Serialize};

use crate::value_objects::{Currency, Money};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDrop {
    pub id: String,
    pub global_inv_id: String,
    pub weapon_name: String,
    pub skin_name: String,
    #[serde(default)]
    pub skin_quality: String,
    #[serde(default)]
    pub skin_rarity: String,
    #[serde(default)]
    pub stattrak: bool,
    pub skin_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_img_source: Option<String>,
    /// Half-open `[lo, hi)` slice of the configured draw space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odds_range: Option<[u64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOdds {
    Range { lo: u64, hi: u64 },
    Weight(u64),
}

impl CaseDrop {
    pub fn display_name(&self) -> String {
        format!("{} | {}", self.weapon_name, self.skin_name)
    }

    /// A drop carrying both a range and a weight is ambiguous and yields `None`.
    pub fn odds(&self) -> Option<DropOdds> {
        match (self.odds_range, self.weight) {
            (Some([lo, hi]), None) => Some(DropOdds::Range { lo, hi }),
            (None, Some(weight)) => Some(DropOdds::Weight(weight)),
            _ => None,
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            global_inv_id: self.global_inv_id.trim().to_string(),
            weapon_name: self.weapon_name.trim().to_string(),
            skin_name: self.skin_name.trim().to_string(),
            skin_quality: self.skin_quality.trim().to_string(),
            skin_rarity: self.skin_rarity.trim().to_string(),
            stattrak: self.stattrak,
            skin_price: self.skin_price,
            skin_img_source: normalize_optional(&self.skin_img_source),
            odds_range: self.odds_range,
            weight: self.weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub url_name: String,
    pub website_name: String,
    pub price: Money,
    #[serde(default)]
    pub expired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub golden_case: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_in_grid: Option<u32>,
    #[serde(default)]
    pub drops: Vec<CaseDrop>,
}

impl Case {
    pub fn currency(&self) -> Currency {
        if self.golden_case {
            Currency::Gold
        } else {
            Currency::Standard
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            url_name: self.url_name.trim().to_lowercase(),
            website_name: self.website_name.trim().to_string(),
            price: self.price,
            expired: self.expired,
            category: normalize_optional(&self.category),
            golden_case: self.golden_case,
            img_name: normalize_optional(&self.img_name),
            position_in_grid: self.position_in_grid,
            drops: self.drops.iter().map(CaseDrop::normalized).collect(),
        }
    }
}

fn normalize_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
}
