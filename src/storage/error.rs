/// Errors that can occur in a key-value backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error occurred while reading or writing the store file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored payload could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The platform does not provide a data directory.
    #[error("could not determine XDG data directory")]
    NoDataDir,

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`PersistenceGateway`](super::PersistenceGateway).
///
/// Reads and writes are kept apart because callers recover from them
/// differently: a failed read falls back to an empty form, a failed write is
/// reported to the user.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The saved record could not be read.
    #[error("could not read saved form: {0}")]
    Read(#[source] StorageError),

    /// The record could not be written.
    #[error("could not save form: {0}")]
    Write(#[source] StorageError),
}
