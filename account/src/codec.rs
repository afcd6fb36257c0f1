use alloy_primitives::{hex, Bytes, B256, U256};
use alloy_rlp::{Decodable, Header};
use store::EMPTY_ROOT_HASH;

use crate::{
    errors::AccountError,
    record::{AccountRecord, EMPTY_CODE_HASH},
};

/// One raw field element on its way into a record. Whatever the caller
/// holds, it coerces to a byte string: byte slices verbatim, unsigned
/// integers as their minimal big-endian form (zero becomes empty), hex text
/// parsed with an optional `0x` prefix.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Bytes(Bytes),
    Uint(U256),
    Hex(String),
}

impl FieldValue {
    fn coerce(&self) -> Result<Bytes, AccountError> {
        match self {
            FieldValue::Bytes(bytes) => Ok(bytes.clone()),
            FieldValue::Uint(value) => Ok(Bytes::from(value.to_be_bytes_trimmed_vec())),
            FieldValue::Hex(text) => hex::decode(text)
                .map(Bytes::from)
                .map_err(|e| AccountError::Decode(format!("bad hex field: {e}"))),
        }
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Uint(U256::from(value))
    }
}

impl From<U256> for FieldValue {
    fn from(value: U256) -> Self {
        FieldValue::Uint(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Hex(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Hex(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue::Bytes(Bytes::from(value.to_vec()))
    }
}

impl From<Bytes> for FieldValue {
    fn from(value: Bytes) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<B256> for FieldValue {
    fn from(value: B256) -> Self {
        FieldValue::Bytes(Bytes::from(value.as_slice().to_vec()))
    }
}

/// Keyed decoder input; absent entries take the field defaults.
#[derive(Debug, Clone, Default)]
pub struct AccountFields {
    pub nonce: Option<FieldValue>,
    pub balance: Option<FieldValue>,
    pub state_root: Option<FieldValue>,
    pub code_hash: Option<FieldValue>,
}

/// The three accepted decoder shapes.
#[derive(Debug, Clone)]
pub enum AccountInput {
    /// Canonical RLP wire bytes.
    Encoded(Bytes),
    /// Up to four elements, positionally `[nonce, balance, state_root,
    /// code_hash]`.
    Ordered(Vec<FieldValue>),
    /// Named fields, any subset.
    Keyed(AccountFields),
}

impl AccountRecord {
    pub fn from_input(input: AccountInput) -> Result<Self, AccountError> {
        match input {
            AccountInput::Encoded(bytes) => decode_encoded(&bytes),
            AccountInput::Ordered(values) => decode_ordered(values),
            AccountInput::Keyed(fields) => decode_keyed(fields),
        }
    }

    /// Decodes the canonical wire form.
    pub fn from_encoded(encoded: &[u8]) -> Result<Self, AccountError> {
        decode_encoded(encoded)
    }

    /// Decodes a hex rendition of the wire form, `0x` prefix optional.
    pub fn from_hex(text: &str) -> Result<Self, AccountError> {
        let bytes = hex::decode(text)
            .map_err(|e| AccountError::Decode(format!("bad hex input: {e}")))?;
        decode_encoded(&bytes)
    }

    pub fn from_ordered(values: Vec<FieldValue>) -> Result<Self, AccountError> {
        decode_ordered(values)
    }

    pub fn from_fields(fields: AccountFields) -> Result<Self, AccountError> {
        decode_keyed(fields)
    }
}

fn decode_encoded(encoded: &[u8]) -> Result<AccountRecord, AccountError> {
    let mut buf = encoded;
    let header = Header::decode(&mut buf).map_err(rlp_error)?;
    if !header.list {
        return Err(AccountError::Decode("expected a list of 4 fields".into()));
    }
    if buf.len() != header.payload_length {
        return Err(AccountError::Decode(
            "trailing bytes after account list".into(),
        ));
    }

    let mut payload = &buf[..header.payload_length];
    let mut elements = Vec::with_capacity(4);
    while !payload.is_empty() {
        if elements.len() == 4 {
            return Err(AccountError::Decode(
                "account list has more than 4 fields".into(),
            ));
        }
        elements.push(Bytes::decode(&mut payload).map_err(rlp_error)?);
    }
    if elements.len() != 4 {
        return Err(AccountError::Decode(format!(
            "account list has {} fields, expected 4",
            elements.len()
        )));
    }

    let mut iter = elements.into_iter().map(FieldValue::Bytes);
    build(iter.next(), iter.next(), iter.next(), iter.next())
}

fn decode_ordered(values: Vec<FieldValue>) -> Result<AccountRecord, AccountError> {
    if values.len() > 4 {
        return Err(AccountError::Decode(format!(
            "{} fields supplied, at most 4 accepted",
            values.len()
        )));
    }
    let mut iter = values.into_iter();
    build(iter.next(), iter.next(), iter.next(), iter.next())
}

fn decode_keyed(fields: AccountFields) -> Result<AccountRecord, AccountError> {
    build(
        fields.nonce,
        fields.balance,
        fields.state_root,
        fields.code_hash,
    )
}

fn build(
    nonce: Option<FieldValue>,
    balance: Option<FieldValue>,
    state_root: Option<FieldValue>,
    code_hash: Option<FieldValue>,
) -> Result<AccountRecord, AccountError> {
    let nonce = resolve(nonce)?.unwrap_or_default();
    let balance = resolve(balance)?.unwrap_or_default();
    let state_root = match resolve(state_root)? {
        Some(bytes) => require_hash(bytes, "stateRoot")?,
        None => EMPTY_ROOT_HASH,
    };
    let code_hash = match resolve(code_hash)? {
        Some(bytes) => require_hash(bytes, "codeHash")?,
        None => EMPTY_CODE_HASH,
    };
    Ok(AccountRecord::new(nonce, balance, state_root, code_hash))
}

// A provided element that coerces to the empty byte string falls back to the
// field default, same as an absent one.
fn resolve(value: Option<FieldValue>) -> Result<Option<Bytes>, AccountError> {
    match value {
        None => Ok(None),
        Some(value) => {
            let bytes = value.coerce()?;
            Ok(if bytes.is_empty() { None } else { Some(bytes) })
        }
    }
}

fn require_hash(bytes: Bytes, field: &'static str) -> Result<B256, AccountError> {
    if bytes.len() != 32 {
        return Err(AccountError::Validation {
            field,
            len: bytes.len(),
        });
    }
    Ok(B256::from_slice(&bytes))
}

fn rlp_error(e: alloy_rlp::Error) -> AccountError {
    AccountError::Decode(e.to_string())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Bytes, B256, U256};
    use proptest::prelude::*;
    use store::EMPTY_ROOT_HASH;

    use super::{AccountFields, AccountInput, FieldValue};
    use crate::{
        errors::AccountError,
        record::{AccountRecord, EMPTY_CODE_HASH},
    };

    fn uint_bytes(value: u128) -> Bytes {
        Bytes::from(U256::from(value).to_be_bytes_trimmed_vec())
    }

    #[test]
    fn ordered_full() {
        let root = B256::repeat_byte(0x11);
        let code = B256::repeat_byte(0x22);
        let record = AccountRecord::from_ordered(vec![
            FieldValue::from(5u64),
            FieldValue::from(1000u64),
            FieldValue::from(root),
            FieldValue::from(code),
        ])
        .unwrap();

        assert_eq!(record.nonce().as_ref(), &[0x05]);
        assert_eq!(record.balance().as_ref(), &[0x03, 0xe8]);
        assert_eq!(record.state_root(), root);
        assert_eq!(record.code_hash(), code);
    }

    #[test]
    fn ordered_short_defaults_the_rest() {
        let record = AccountRecord::from_ordered(vec![FieldValue::from(1u64)]).unwrap();
        assert_eq!(record.nonce().as_ref(), &[0x01]);
        assert!(record.balance().is_empty());
        assert_eq!(record.state_root(), EMPTY_ROOT_HASH);
        assert_eq!(record.code_hash(), EMPTY_CODE_HASH);
    }

    #[test]
    fn ordered_overflow_is_rejected() {
        let values = vec![
            FieldValue::from(1u64),
            FieldValue::from(2u64),
            FieldValue::from(B256::ZERO),
            FieldValue::from(B256::ZERO),
            FieldValue::from(3u64),
        ];
        assert!(matches!(
            AccountRecord::from_ordered(values),
            Err(AccountError::Decode(_))
        ));
    }

    #[test]
    fn keyed_partial() {
        let record = AccountRecord::from_fields(AccountFields {
            balance: Some(FieldValue::from("0x0de0b6b3a7640000")),
            ..Default::default()
        })
        .unwrap();

        assert!(record.nonce().is_empty());
        assert_eq!(record.balance().len(), 8);
        assert_eq!(record.state_root(), EMPTY_ROOT_HASH);
        assert_eq!(record.code_hash(), EMPTY_CODE_HASH);
        assert!(!record.is_empty());
    }

    #[test]
    fn keyed_empty_is_the_default_record() {
        let record = AccountRecord::from_fields(AccountFields::default()).unwrap();
        assert_eq!(record, AccountRecord::default());
        assert!(record.is_empty());
    }

    #[test]
    fn empty_coercion_falls_back_to_defaults() {
        let record = AccountRecord::from_ordered(vec![
            FieldValue::from("0x"),
            FieldValue::from(0u64),
            FieldValue::from(""),
            FieldValue::from(Vec::<u8>::new()),
        ])
        .unwrap();
        assert_eq!(record, AccountRecord::default());
    }

    #[test]
    fn hash_length_is_validated() {
        let short = AccountRecord::from_fields(AccountFields {
            state_root: Some(FieldValue::from(vec![0xab; 31])),
            ..Default::default()
        });
        assert_eq!(
            short,
            Err(AccountError::Validation {
                field: "stateRoot",
                len: 31
            })
        );

        let long = AccountRecord::from_fields(AccountFields {
            code_hash: Some(FieldValue::from(vec![0xab; 33])),
            ..Default::default()
        });
        assert_eq!(
            long,
            Err(AccountError::Validation {
                field: "codeHash",
                len: 33
            })
        );
    }

    #[test]
    fn extreme_hash_values_are_accepted() {
        for byte in [0x00u8, 0xff] {
            let record = AccountRecord::from_fields(AccountFields {
                state_root: Some(FieldValue::from(vec![byte; 32])),
                code_hash: Some(FieldValue::from(vec![byte; 32])),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(record.state_root(), B256::repeat_byte(byte));
            assert_eq!(record.code_hash(), B256::repeat_byte(byte));
        }
    }

    #[test]
    fn hex_wire_input() {
        let record = AccountRecord::new(
            uint_bytes(9),
            uint_bytes(1_000_000),
            B256::repeat_byte(0x33),
            B256::repeat_byte(0x44),
        );
        let hex_plain = alloy_primitives::hex::encode(record.serialize());
        let hex_prefixed = format!("0x{hex_plain}");

        assert_eq!(AccountRecord::from_hex(&hex_plain).unwrap(), record);
        assert_eq!(AccountRecord::from_hex(&hex_prefixed).unwrap(), record);
    }

    #[test]
    fn bad_hex_is_a_decode_error() {
        assert!(matches!(
            AccountRecord::from_hex("0xzz"),
            Err(AccountError::Decode(_))
        ));
    }

    fn wire_list(elements: &[&[u8]]) -> Vec<u8> {
        let mut payload = Vec::new();
        for element in elements {
            payload.extend(alloy_rlp::encode(Bytes::from(element.to_vec())));
        }
        let mut out = vec![0xc0 + payload.len() as u8];
        out.extend(payload);
        out
    }

    #[test]
    fn wire_three_fields_rejected() {
        let three = wire_list(&[&[0x01], &[0x02], &[0u8; 32]]);
        assert!(matches!(
            AccountRecord::from_encoded(&three),
            Err(AccountError::Decode(_))
        ));
    }

    #[test]
    fn wire_five_fields_rejected() {
        let five = wire_list(&[&[0x01], &[0x02], &[0x03], &[0x04], &[0x05]]);
        assert!(matches!(
            AccountRecord::from_encoded(&five),
            Err(AccountError::Decode(_))
        ));
    }

    #[test]
    fn wire_non_list_is_rejected() {
        let encoded = alloy_rlp::encode(Bytes::from(b"not a list".to_vec()));
        assert!(matches!(
            AccountRecord::from_encoded(&encoded),
            Err(AccountError::Decode(_))
        ));
    }

    #[test]
    fn wire_trailing_bytes_are_rejected() {
        let mut encoded = AccountRecord::default().serialize();
        encoded.push(0x00);
        assert!(matches!(
            AccountRecord::from_encoded(&encoded),
            Err(AccountError::Decode(_))
        ));
    }

    #[test]
    fn input_union_matches_direct_constructors() {
        let record = AccountRecord::new(
            uint_bytes(7),
            uint_bytes(42),
            B256::repeat_byte(0x55),
            B256::repeat_byte(0x66),
        );

        let via_encoded =
            AccountRecord::from_input(AccountInput::Encoded(record.serialize().into())).unwrap();
        assert_eq!(via_encoded, record);

        let via_ordered = AccountRecord::from_input(AccountInput::Ordered(vec![
            FieldValue::from(7u64),
            FieldValue::from(42u64),
            FieldValue::from(B256::repeat_byte(0x55)),
            FieldValue::from(B256::repeat_byte(0x66)),
        ]))
        .unwrap();
        assert_eq!(via_ordered, record);
    }

    proptest! {
        #[test]
        fn round_trip(
            nonce: u128,
            balance: u128,
            state_root: [u8; 32],
            code_hash: [u8; 32],
        ) {
            let record = AccountRecord::new(
                uint_bytes(nonce),
                uint_bytes(balance),
                B256::from(state_root),
                B256::from(code_hash),
            );
            let decoded = AccountRecord::from_encoded(&record.serialize()).unwrap();
            prop_assert_eq!(decoded, record);
        }
    }
}
