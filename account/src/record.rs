use alloy_primitives::{b256, hex, Bytes, B256};
use alloy_rlp::RlpEncodable;
use serde_json::{json, Value};
use store::EMPTY_ROOT_HASH;

/// keccak256 of the empty byte string, the code hash of every account that
/// carries no contract code.
pub const EMPTY_CODE_HASH: B256 =
    b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// One account of the ledger.
///
/// `nonce` and `balance` are unsigned integers kept as minimal big-endian
/// byte strings (empty means zero); `state_root` identifies the version of
/// the account's own key-value storage; `code_hash` is the content address
/// of its contract code. The two hash fields are exactly 32 bytes by type.
///
/// Records are built through [`Self::new`], [`Default`] or the decoders in
/// [`crate::codec`]. After construction only the storage bridge mutates a
/// record, and only `state_root`/`code_hash`; every update replaces the
/// field with a new owned value.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable)]
pub struct AccountRecord {
    nonce: Bytes,
    balance: Bytes,
    state_root: B256,
    code_hash: B256,
}

impl Default for AccountRecord {
    fn default() -> Self {
        Self {
            nonce: Bytes::default(),
            balance: Bytes::default(),
            state_root: EMPTY_ROOT_HASH,
            code_hash: EMPTY_CODE_HASH,
        }
    }
}

impl AccountRecord {
    pub fn new(nonce: Bytes, balance: Bytes, state_root: B256, code_hash: B256) -> Self {
        Self {
            nonce,
            balance,
            state_root,
            code_hash,
        }
    }

    pub fn nonce(&self) -> &Bytes {
        &self.nonce
    }

    pub fn balance(&self) -> &Bytes {
        &self.balance
    }

    pub fn state_root(&self) -> B256 {
        self.state_root
    }

    pub fn code_hash(&self) -> B256 {
        self.code_hash
    }

    pub(crate) fn set_state_root(&mut self, root: B256) {
        self.state_root = root;
    }

    pub(crate) fn set_code_hash(&mut self, hash: B256) {
        self.code_hash = hash;
    }

    pub fn is_contract(&self) -> bool {
        self.code_hash != EMPTY_CODE_HASH
    }

    /// True only for the fully defaulted record: zero nonce, zero balance,
    /// no code and no storage.
    pub fn is_empty(&self) -> bool {
        self.nonce.is_empty()
            && self.balance.is_empty()
            && self.code_hash == EMPTY_CODE_HASH
            && self.state_root == EMPTY_ROOT_HASH
    }

    /// Canonical RLP wire form: the list
    /// `[nonce, balance, state_root, code_hash]`, fields unpadded.
    pub fn serialize(&self) -> Vec<u8> {
        alloy_rlp::encode(self)
    }

    pub fn serialized_length(&self) -> usize {
        alloy_rlp::Encodable::length(self)
    }

    /// Informational rendering, not part of the wire format: either a
    /// 4-element array of `0x`-hex strings in field order, or an object with
    /// named fields when `labeled`.
    pub fn to_display(&self, labeled: bool) -> Value {
        let nonce = hex::encode_prefixed(&self.nonce);
        let balance = hex::encode_prefixed(&self.balance);
        let state_root = hex::encode_prefixed(self.state_root);
        let code_hash = hex::encode_prefixed(self.code_hash);
        if labeled {
            json!({
                "nonce": nonce,
                "balance": balance,
                "stateRoot": state_root,
                "codeHash": code_hash,
            })
        } else {
            json!([nonce, balance, state_root, code_hash])
        }
    }
}
