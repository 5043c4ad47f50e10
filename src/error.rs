//! Error types for the lending ledger

use thiserror::Error;

/// Main ledger error type
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Malformed identifier or contact address. Nothing was mutated.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identifier collision on registration.
    #[error("Duplicate identifier: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// No copies of the catalog entry are available to lend.
    #[error("No copies available: {0}")]
    OutOfStock(String),

    /// The member already holds the maximum number of open loans.
    #[error("Borrowing limit reached: {0}")]
    LimitExceeded(String),

    #[error("Loan already returned: {0}")]
    AlreadyReturned(String),

    /// Durable read or write failed. Fatal for the operation; the in-memory
    /// store is left as it was before the operation started.
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
