use alloy_primitives::B256;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown root {0}")]
    UnknownRoot(B256),
    #[error("store backend failure: {0}")]
    Backend(String),
}
