pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod model;
pub mod seed;
pub mod storage;
pub mod store;

pub use error::AppError;
pub use filter::{StatusSelector, TaskFilter, TaskStats, matches};
pub use model::{Task, TaskInput, TaskPatch, TaskPriority, TaskStatus};
pub use storage::{JsonFileStore, MemoryStore, PersistencePort, STORAGE_KEY};
pub use store::TaskStore;
