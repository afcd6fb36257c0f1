pub use errors::StoreError;
pub use memory_store::MemoryStore;

pub mod errors;
pub mod memory_store;

use alloy_primitives::{b256, Bytes, B256};

/// Root of the empty versioned mapping: keccak256 of the RLP empty string.
pub const EMPTY_ROOT_HASH: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// Versioned key-value store handle, plus a flat content-addressed keyspace.
///
/// A handle identifies one version of the mapping through its `root`.
/// `branch` yields an independent handle over the same persisted content, so
/// a branch can be repointed and mutated without disturbing the handle it
/// was taken from. `put` is copy-on-write: every root ever returned stays
/// addressable.
pub trait Store {
    fn root(&self) -> B256;

    fn set_root(&mut self, root: B256);

    fn branch(&self) -> Box<dyn Store>;

    /// Point lookup in the version identified by `root()`.
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, StoreError>;

    /// Inserts into the version identified by `root()`; on success `root()`
    /// identifies the new version.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Lookup in the flat content-addressed keyspace.
    fn get_raw(&self, key: B256) -> Result<Option<Bytes>, StoreError>;

    /// Insert into the flat content-addressed keyspace. Callers key by the
    /// hash of the value, which makes repeated writes idempotent.
    fn put_raw(&mut self, key: B256, value: &[u8]) -> Result<(), StoreError>;
}
