//! Persistence port and its adapters.
//!
//! The store keeps one opaque blob under [`STORAGE_KEY`]: the JSON array of
//! every task, in store order. Adapters only move bytes; encoding lives in
//! [`codec`].

use crate::error::AppError;

pub mod codec;
pub mod json_store;
pub mod memory;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

/// Fixed key the task blob is stored under.
pub const STORAGE_KEY: &str = "taskManager_tasks";

/// Synchronous key-value medium holding the task blob.
///
/// `read` returns `Ok(None)` when nothing has been stored yet. Failures are
/// reported as [`AppError::PersistenceRead`] and [`AppError::PersistenceWrite`].
pub trait PersistencePort {
    fn read(&self) -> Result<Option<Vec<u8>>, AppError>;

    fn write(&mut self, bytes: &[u8]) -> Result<(), AppError>;
}

impl<P: PersistencePort + ?Sized> PersistencePort for Box<P> {
    fn read(&self) -> Result<Option<Vec<u8>>, AppError> {
        (**self).read()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), AppError> {
        (**self).write(bytes)
    }
}
