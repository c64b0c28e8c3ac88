use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for domain, service, and storage layers.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid amount: {0} (expected a positive value)")]
    InvalidAmount(i64),
    #[error("insufficient funds on goal {goal}: holds {available}, requested {requested}")]
    InsufficientFunds {
        goal: Uuid,
        available: i64,
        requested: i64,
    },
    #[error("allocation of {requested} exceeds remaining budget of {remaining} for period {period}")]
    OverAllocation {
        period: Uuid,
        requested: i64,
        remaining: i64,
    },
    #[error("budget period not found: {0}")]
    PeriodNotFound(Uuid),
    #[error("budget category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("savings goal not found: {0}")]
    GoalNotFound(Uuid),
    #[error("transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("a fixed-term goal requires a target date")]
    MissingTargetDate,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("persistence error: {0}")]
    Storage(String),
}

pub type LedgerResult<T> = StdResult<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
