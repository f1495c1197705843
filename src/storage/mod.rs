//! Form persistence: the key-value backends and the record gateway.
//!
//! The whole [`FormRecord`](crate::model::FormRecord) lives under one fixed
//! key as a JSON text payload. [`FileStore`] keeps the key-value map in a
//! single JSON file; [`MemoryStore`] keeps it in process.

mod error;
mod file;
mod gateway;
mod memory;
mod store;

pub use error::{PersistenceError, StorageError};
pub use file::FileStore;
pub use gateway::{FORM_RECORD_KEY, PersistenceGateway};
pub use memory::MemoryStore;
pub use store::KeyValueStore;
