// Item status value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Kept,
    Sold,
    Upgraded,
}

impl ItemStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ItemStatus::Kept)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Kept => "kept",
            ItemStatus::Sold => "sold",
            ItemStatus::Upgraded => "upgraded",
        }
    }
}
