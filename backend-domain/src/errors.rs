use thiserror::Error;

use crate::value_objects::{ItemId, Money};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("invalid case: {0}")]
    InvalidCase(String),
    #[error("winning position {position} is outside a reel of length {length}")]
    InvalidReel { length: usize, position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Money, available: Money },
    #[error("item {0} is already sold or upgraded")]
    ItemAlreadySettled(ItemId),
    #[error("invalid opening transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("account not found")]
    AccountNotFound,
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Money, available: Money },
    #[error("amount {0} must not be negative")]
    NegativeAmount(Money),
    #[error("item {0} not found")]
    ItemNotFound(ItemId),
    #[error("item {0} is already sold or upgraded")]
    ItemAlreadySettled(ItemId),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InsufficientBalance {
                required,
                available,
            } => LedgerError::InsufficientBalance {
                required,
                available,
            },
            DomainError::ItemAlreadySettled(item_id) => LedgerError::ItemAlreadySettled(item_id),
            other => LedgerError::Storage(anyhow::anyhow!(other)),
        }
    }
}
