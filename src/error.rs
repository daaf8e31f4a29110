use thiserror::Error;

pub use crate::store::StoreError;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
///
/// A refused access decision is not an error; it is returned as data in
/// [`crate::Decision`].
#[derive(Debug, Error)]
pub enum Error {
    /// Store error wrapper.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// Invalid identifier input.
    #[error("invalid id: {0}")]
    InvalidId(String),
    /// Malformed permission matrix on a write path.
    #[error("invalid permission matrix: {0}")]
    Validation(String),
}
