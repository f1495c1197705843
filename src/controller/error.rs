use crate::model::ValidationError;
use crate::storage::PersistenceError;

/// Why a submission did not produce a saved record.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// One or more fields were empty; nothing was saved.
    #[error(transparent)]
    Incomplete(#[from] ValidationError),

    /// The record was valid but could not be saved. It is still in memory.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A load or another submission is still in progress.
    #[error("a submission is already in progress")]
    Busy,
}
