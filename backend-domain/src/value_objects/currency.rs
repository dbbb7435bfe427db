// Currency value object
// Golden cases are paid from the gold balance; everything else from the main balance.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Standard,
    Gold,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Standard => "standard",
            Currency::Gold => "gold",
        }
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "gold" => Currency::Gold,
            _ => Currency::Standard,
        }
    }
}
