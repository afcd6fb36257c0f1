use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use alloy_primitives::{keccak256, Bytes, B256};
use alloy_rlp::{Decodable, RlpDecodable, RlpEncodable};

use crate::{Store, StoreError, EMPTY_ROOT_HASH};

/// In-memory [`Store`]. Each version is a full snapshot of the mapping,
/// RLP-encoded as a key-sorted entry list and persisted under its keccak256
/// hash, so copy-on-write and root stability fall out of content addressing.
/// Handles share the persisted maps, which makes `branch` a cheap clone.
#[derive(Clone)]
pub struct MemoryStore {
    shared: Arc<RwLock<Shared>>,
    root: B256,
}

#[derive(Default)]
struct Shared {
    versions: HashMap<B256, Vec<u8>>,
    flat: HashMap<B256, Vec<u8>>,
}

#[derive(RlpEncodable, RlpDecodable)]
struct Entry {
    key: Bytes,
    value: Bytes,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            shared: Arc::default(),
            root: EMPTY_ROOT_HASH,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries_at(&self, root: B256) -> Result<Vec<Entry>, StoreError> {
        if root == EMPTY_ROOT_HASH {
            return Ok(Vec::new());
        }
        let shared = self.shared.read().map_err(|_| lock_poisoned())?;
        let encoded = shared
            .versions
            .get(&root)
            .ok_or(StoreError::UnknownRoot(root))?;
        Vec::<Entry>::decode(&mut encoded.as_slice())
            .map_err(|e| StoreError::Backend(format!("corrupt snapshot {root}: {e}")))
    }
}

fn lock_poisoned() -> StoreError {
    StoreError::Backend("store lock poisoned".into())
}

impl Store for MemoryStore {
    fn root(&self) -> B256 {
        self.root
    }

    fn set_root(&mut self, root: B256) {
        self.root = root;
    }

    fn branch(&self) -> Box<dyn Store> {
        Box::new(self.clone())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, StoreError> {
        let entries = self.entries_at(self.root)?;
        Ok(entries
            .into_iter()
            .find(|entry| entry.key.as_ref() == key)
            .map(|entry| entry.value))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.entries_at(self.root)?;
        match entries.iter_mut().find(|entry| entry.key.as_ref() == key) {
            Some(entry) => entry.value = Bytes::from(value.to_vec()),
            None => {
                entries.push(Entry {
                    key: Bytes::from(key.to_vec()),
                    value: Bytes::from(value.to_vec()),
                });
                entries.sort_by(|a, b| a.key.as_ref().cmp(b.key.as_ref()));
            }
        }
        let encoded = alloy_rlp::encode(&entries);
        let new_root = keccak256(&encoded);
        self.shared
            .write()
            .map_err(|_| lock_poisoned())?
            .versions
            .insert(new_root, encoded);
        self.root = new_root;
        Ok(())
    }

    fn get_raw(&self, key: B256) -> Result<Option<Bytes>, StoreError> {
        let shared = self.shared.read().map_err(|_| lock_poisoned())?;
        Ok(shared.flat.get(&key).map(|v| Bytes::from(v.to_vec())))
    }

    fn put_raw(&mut self, key: B256, value: &[u8]) -> Result<(), StoreError> {
        self.shared
            .write()
            .map_err(|_| lock_poisoned())?
            .flat
            .insert(key, value.to_vec());
        Ok(())
    }
}
