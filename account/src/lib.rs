pub use bridge::{get_code, get_storage, set_code, set_storage};
pub use codec::{AccountFields, AccountInput, FieldValue};
pub use errors::{AccountError, StorageWriteError};
pub use record::{AccountRecord, EMPTY_CODE_HASH};
pub use store::EMPTY_ROOT_HASH;

pub mod bridge;
pub mod codec;
pub mod errors;
pub mod record;
