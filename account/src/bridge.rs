//! Store-facing operations: code resolution through the flat
//! content-addressed keyspace and per-account storage through a branched
//! versioned view.
//!
//! Every operation performs its store calls inline and returns once the
//! store has answered. Mutating operations take `&mut AccountRecord`, so two
//! in-flight mutations of one record are a compile error rather than a race.

use alloy_primitives::{keccak256, Bytes, B256};
use store::{Store, StoreError};
use tracing::{debug, warn};

use crate::{
    errors::StorageWriteError,
    record::{AccountRecord, EMPTY_CODE_HASH},
};

/// Resolves the record's contract code. Non-contract accounts have no code
/// by definition, so the store is not consulted for them.
pub fn get_code(store: &dyn Store, record: &AccountRecord) -> Result<Bytes, StoreError> {
    if !record.is_contract() {
        return Ok(Bytes::default());
    }
    let code_hash = record.code_hash();
    match store.get_raw(code_hash)? {
        Some(code) => Ok(code),
        // The record points at code the store never received; a lookup miss
        // here is corruption, not an absent value.
        None => Err(StoreError::Backend(format!(
            "code missing for hash {code_hash}"
        ))),
    }
}

/// Stores contract code under its keccak256 hash and repoints the record at
/// it. Empty code needs no store entry. The record is only touched once the
/// store has acknowledged the write.
pub fn set_code(
    store: &mut dyn Store,
    record: &mut AccountRecord,
    code: &[u8],
) -> Result<B256, StoreError> {
    let code_hash = keccak256(code);
    if code_hash == EMPTY_CODE_HASH {
        record.set_code_hash(EMPTY_CODE_HASH);
        return Ok(EMPTY_CODE_HASH);
    }
    store.put_raw(code_hash, code)?;
    record.set_code_hash(code_hash);
    debug!(%code_hash, len = code.len(), "stored contract code");
    Ok(code_hash)
}

/// Point lookup in the account's own storage at its current state root.
/// The record is never touched.
pub fn get_storage(
    store: &dyn Store,
    record: &AccountRecord,
    key: &[u8],
) -> Result<Option<Bytes>, StoreError> {
    let mut view = store.branch();
    view.set_root(record.state_root());
    view.get(key)
}

/// Writes one storage slot through a branched view. The state root advances
/// to the branch root only once the store has confirmed the write; the
/// previous root stays addressable for any other holder. On failure the
/// record is untouched and the store error is logged, not surfaced.
pub fn set_storage(
    store: &dyn Store,
    record: &mut AccountRecord,
    key: &[u8],
    value: &[u8],
) -> Result<(), StorageWriteError> {
    let mut view = store.branch();
    view.set_root(record.state_root());
    match view.put(key, value) {
        Ok(()) => {
            record.set_state_root(view.root());
            Ok(())
        }
        Err(cause) => {
            warn!(%cause, "storage write failed, state root unchanged");
            Err(StorageWriteError::new(cause))
        }
    }
}
