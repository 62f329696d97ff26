//! Infrastructure error types for the utility layer.
//!
//! User-facing compile errors never travel this way - they are
//! collected as [`Diagnostic`](crate::Diagnostic)s. `UtilError` covers
//! misuse of the infrastructure itself, where a caller wants a
//! `Result` instead of the panic the convenience APIs use.

use thiserror::Error;

/// An infrastructure failure inside `hexc-util`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UtilError {
    /// A symbol handle this process's interner never issued.
    #[error("unknown symbol: index {index} is out of range")]
    UnknownSymbol { index: u32 },
}

/// Result type alias for utility operations.
pub type UtilResult<T> = std::result::Result<T, UtilError>;
