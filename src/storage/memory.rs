use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::error::StorageError;
use super::store::KeyValueStore;

#[derive(Debug, Default)]
struct Inner {
    entries: Mutex<HashMap<String, String>>,
    #[cfg(test)]
    faults: faults::Faults,
}

/// An in-process key-value store.
///
/// Clones share the same entries, so a caller can keep a handle while the
/// gateway owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(test)]
        self.inner.faults.before_read()?;
        Ok(lock(&self.inner.entries).get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        #[cfg(test)]
        self.inner.faults.before_write().await?;
        lock(&self.inner.entries).insert(key.to_owned(), value);
        Ok(())
    }
}

/// Failure and latency injection for tests.
#[cfg(test)]
mod faults {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::{MemoryStore, StorageError, lock};

    #[derive(Debug, Default)]
    pub(super) struct Faults {
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
        write_delay: Mutex<Option<Duration>>,
    }

    impl Faults {
        pub(super) fn before_read(&self) -> Result<(), StorageError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("reads disabled".into()));
            }
            Ok(())
        }

        pub(super) async fn before_write(&self) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let delay = *lock(&self.write_delay);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("writes disabled".into()));
            }
            Ok(())
        }
    }

    impl MemoryStore {
        /// Makes every subsequent read fail with [`StorageError::Unavailable`].
        pub fn fail_reads(&self, fail: bool) {
            self.inner.faults.fail_reads.store(fail, Ordering::SeqCst);
        }

        /// Makes every subsequent write fail with [`StorageError::Unavailable`].
        pub fn fail_writes(&self, fail: bool) {
            self.inner.faults.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Delays every subsequent write by `delay` before it is applied.
        pub fn delay_writes(&self, delay: Option<Duration>) {
            *lock(&self.inner.faults.write_delay) = delay;
        }

        /// Returns the number of write attempts, failed ones included.
        pub fn write_count(&self) -> usize {
            self.inner.faults.writes.load(Ordering::SeqCst)
        }

        /// Returns the raw value under `key` without going through the async API.
        pub fn raw(&self, key: &str) -> Option<String> {
            lock(&self.inner.entries).get(key).cloned()
        }

        /// Stores a raw value, bypassing failure injection.
        pub fn insert_raw(&self, key: &str, value: impl Into<String>) {
            lock(&self.inner.entries).insert(key.to_owned(), value.into());
        }
    }
}
