//! Error taxonomy shared across the ledger.

use thiserror::Error;

/// All error kinds the ledger surfaces to callers.
///
/// `InvalidData` and `InvalidTimer` come out of pure parsing/validation and
/// are recoverable by fixing the input. `Conflict` and `NotFound` are
/// first-class outcomes of storage operations. `Internal` wraps backend I/O
/// or serialization failures and propagates to the top-level caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed filter syntax, malformed date, or a redeclared filter key.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A timer violates the structural invariants.
    #[error("invalid timer: {0}")]
    InvalidTimer(String),

    /// A write would overlap an existing interval or create a second
    /// running timer.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No record matched the given id, filter, or ordering.
    #[error("not found")]
    NotFound,

    /// Backend I/O or serialization failure.
    #[error("internal error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn invalid_timer(message: impl Into<String>) -> Self {
        Self::InvalidTimer(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Internal(source.into())
    }

    /// True for the `NotFound` kind. Callers routinely branch on this to
    /// treat an empty ledger as a normal state.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
