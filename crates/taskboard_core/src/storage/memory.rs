use super::{PersistencePort, STORAGE_KEY};
use crate::error::AppError;
use std::cell::Cell;
use std::collections::HashMap;

/// In-memory key-value medium.
///
/// Reads and writes can be switched to fail so callers can exercise the
/// store's recovery paths without a real storage medium.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
    reads: Cell<usize>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob<B: Into<Vec<u8>>>(bytes: B) -> Self {
        let mut store = Self::default();
        store.entries.insert(STORAGE_KEY.to_string(), bytes.into());
        store
    }

    pub fn blob(&self) -> Option<&[u8]> {
        self.entries.get(STORAGE_KEY).map(Vec::as_slice)
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of `read` calls seen, failed ones included.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl PersistencePort for MemoryStore {
    fn read(&self) -> Result<Option<Vec<u8>>, AppError> {
        self.reads.set(self.reads.get() + 1);
        if self.fail_reads {
            return Err(AppError::persistence_read("storage medium is unavailable"));
        }
        Ok(self.entries.get(STORAGE_KEY).cloned())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::persistence_write("storage quota exceeded"));
        }
        self.entries.insert(STORAGE_KEY.to_string(), bytes.to_vec());
        self.writes += 1;
        Ok(())
    }
}
