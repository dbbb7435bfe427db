use thiserror::Error;

use backend_domain::{DomainError, DrawError, LedgerError, Money};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("case is not openable: {0}")]
    InvalidCase(String),
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Money, available: Money },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<LedgerError> for AppError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::AccountNotFound => AppError::NotFound("account".to_string()),
            LedgerError::UsernameTaken(name) => {
                AppError::Conflict(format!("username '{}' is already taken", name))
            }
            LedgerError::InsufficientBalance {
                required,
                available,
            } => AppError::InsufficientBalance {
                required,
                available,
            },
            LedgerError::NegativeAmount(amount) => {
                AppError::BadRequest(format!("amount {} must not be negative", amount))
            }
            LedgerError::ItemNotFound(item_id) => AppError::NotFound(format!("item {}", item_id)),
            LedgerError::ItemAlreadySettled(item_id) => {
                AppError::Conflict(format!("item {} is already sold or upgraded", item_id))
            }
            LedgerError::Storage(err) => AppError::Internal(err),
        }
    }
}

impl From<DrawError> for AppError {
    fn from(value: DrawError) -> Self {
        match value {
            DrawError::InvalidCase(reason) => AppError::InvalidCase(reason),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InsufficientBalance {
                required,
                available,
            } => AppError::InsufficientBalance {
                required,
                available,
            },
            DomainError::ItemAlreadySettled(item_id) => {
                AppError::Conflict(format!("item {} is already sold or upgraded", item_id))
            }
            other => AppError::Internal(other.into()),
        }
    }
}
