use super::error::{PersistenceError, StorageError};
use super::store::KeyValueStore;
use crate::model::FormRecord;

/// The fixed storage key the form record is saved under.
pub const FORM_RECORD_KEY: &str = "form_record";

/// Load/save round trip of the one [`FormRecord`] slot.
///
/// The gateway keeps no copy of the record between calls; every `load`
/// goes to the backend.
pub struct PersistenceGateway<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    /// Creates a gateway over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the last saved record.
    ///
    /// Returns `Ok(None)` when nothing has ever been saved, which is distinct
    /// from a saved record whose fields are all empty.
    pub async fn load(&self) -> Result<Option<FormRecord>, PersistenceError> {
        let Some(payload) = self
            .store
            .get(FORM_RECORD_KEY)
            .await
            .map_err(PersistenceError::Read)?
        else {
            return Ok(None);
        };
        let record = serde_json::from_str(&payload)
            .map_err(|e| PersistenceError::Read(StorageError::Json(e)))?;
        Ok(Some(record))
    }

    /// Saves `record` as one unit, overwriting any prior value.
    pub async fn save(&self, record: &FormRecord) -> Result<(), PersistenceError> {
        let payload = serde_json::to_string(record)
            .map_err(|e| PersistenceError::Write(StorageError::Json(e)))?;
        self.store
            .set(FORM_RECORD_KEY, payload)
            .await
            .map_err(PersistenceError::Write)
    }
}
