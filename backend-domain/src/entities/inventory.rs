// Inventory item entity
// A drop instance owned by an account; flagged, never deleted

use serde::{Deserialize, Serialize};

use crate::entities::CaseDrop;
use crate::errors::DomainError;
use crate::value_objects::{AccountId, ItemId, ItemStatus, Money};

/// Copy of the won drop taken at acquisition time; sale value comes from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropSnapshot {
    pub drop_id: String,
    pub weapon_name: String,
    pub skin_name: String,
    pub skin_quality: String,
    pub skin_rarity: String,
    pub stattrak: bool,
    pub skin_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_img_source: Option<String>,
}

impl From<&CaseDrop> for DropSnapshot {
    fn from(drop: &CaseDrop) -> Self {
        Self {
            drop_id: drop.id.clone(),
            weapon_name: drop.weapon_name.clone(),
            skin_name: drop.skin_name.clone(),
            skin_quality: drop.skin_quality.clone(),
            skin_rarity: drop.skin_rarity.clone(),
            stattrak: drop.stattrak,
            skin_price: drop.skin_price,
            skin_img_source: drop.skin_img_source.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: ItemId,
    pub owner_id: AccountId,
    pub global_inv_id: String,
    pub drop: DropSnapshot,
    pub origin: String,
    pub opening_id: String,
    pub drop_date: i64,
    #[serde(default)]
    pub status: ItemStatus,
}

impl InventoryItem {
    pub fn new(
        owner_id: AccountId,
        drop: &CaseDrop,
        origin: &str,
        opening_id: &str,
        drop_date: i64,
    ) -> Self {
        Self {
            item_id: ItemId::generate(),
            owner_id,
            global_inv_id: drop.global_inv_id.clone(),
            drop: DropSnapshot::from(drop),
            origin: origin.to_string(),
            opening_id: opening_id.to_string(),
            drop_date,
            status: ItemStatus::Kept,
        }
    }

    /// Moves the item to `Sold` and returns the amount to credit.
    pub fn sell(&mut self) -> Result<Money, DomainError> {
        self.settle(ItemStatus::Sold)?;
        Ok(self.drop.skin_price)
    }

    pub fn mark_upgraded(&mut self) -> Result<(), DomainError> {
        self.settle(ItemStatus::Upgraded)
    }

    fn settle(&mut self, next: ItemStatus) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::ItemAlreadySettled(self.item_id.clone()));
        }
        self.status = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemView {
    pub item_id: ItemId,
    pub global_inv_id: String,
    pub drop: DropSnapshot,
    pub origin: String,
    pub opening_id: String,
    pub drop_date: i64,
    pub sold: bool,
    pub upgraded: bool,
}

impl From<&InventoryItem> for InventoryItemView {
    fn from(item: &InventoryItem) -> Self {
        Self {
            item_id: item.item_id.clone(),
            global_inv_id: item.global_inv_id.clone(),
            drop: item.drop.clone(),
            origin: item.origin.clone(),
            opening_id: item.opening_id.clone(),
            drop_date: item.drop_date,
            sold: item.status == ItemStatus::Sold,
            upgraded: item.status == ItemStatus::Upgraded,
        }
    }
}
