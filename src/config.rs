//! Application paths and startup settings.

use std::path::{Path, PathBuf};

use crate::model::RoomChoices;
use crate::storage::StorageError;

/// Directory name under the platform data directory.
const APP_DIR: &str = "roomform";
/// File holding the key-value store.
const STORAGE_FILE: &str = "storage.json";
/// File receiving the tracing output.
const LOG_FILE: &str = "roomform.log";

/// Where the app keeps its files and which rooms it offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    data_dir: PathBuf,
    rooms: RoomChoices,
}

impl AppConfig {
    /// Creates a config rooted at the XDG data directory
    /// (`~/.local/share/roomform/` on Linux) with the default rooms.
    pub fn new() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(Self::with_data_dir(data_dir.join(APP_DIR)))
    }

    /// Creates a config rooted at `data_dir` with the default rooms.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            rooms: RoomChoices::default(),
        }
    }

    /// Replaces the offered rooms.
    pub fn with_rooms(mut self, rooms: RoomChoices) -> Self {
        self.rooms = rooms;
        self
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path of the key-value store file.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }

    /// Returns the path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Returns the offered rooms.
    pub fn rooms(&self) -> &RoomChoices {
        &self.rooms
    }
}
