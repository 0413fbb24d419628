use cashview_domain::CalendarError;
use thiserror::Error;
use uuid::Uuid;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("No records found: {0}")]
    NoRecords(String),
    #[error("A budget for category `{0}` already exists")]
    DuplicateBudget(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`CoreError`] for callers mapping failures to outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Store,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::BudgetNotFound(_)
            | CoreError::TransactionNotFound(_)
            | CoreError::NoRecords(_) => ErrorKind::NotFound,
            CoreError::DuplicateBudget(_) => ErrorKind::Conflict,
            CoreError::Storage(_) | CoreError::Serde(_) | CoreError::Io(_) => ErrorKind::Store,
        }
    }
}

impl From<CalendarError> for CoreError {
    fn from(err: CalendarError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
