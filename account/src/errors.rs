use std::fmt;

use store::StoreError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    /// Malformed wire bytes, bad hex, or an ordered input with too many
    /// fields.
    #[error("invalid data: {0}")]
    Decode(String),
    /// A hash field whose coerced value is not exactly 32 bytes.
    #[error("{field} must be 32 bytes, got {len}")]
    Validation { field: &'static str, len: usize },
}

/// Failure signal for `set_storage`. The store's own error stays out of the
/// message and is never exposed as a source; it is kept for `Debug` output
/// and logged at `warn` level where the failure is produced.
#[derive(Error)]
#[error("storage write failed")]
pub struct StorageWriteError {
    cause: StoreError,
}

impl StorageWriteError {
    pub(crate) fn new(cause: StoreError) -> Self {
        Self { cause }
    }
}

impl fmt::Debug for StorageWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageWriteError")
            .field("cause", &self.cause)
            .finish()
    }
}
