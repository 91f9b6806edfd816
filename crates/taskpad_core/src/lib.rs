//! Core domain logic for Taskpad.
//! This crate is the single source of truth for task-list invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{MalformedRecord, Task};
pub use service::task_service::{TaskDraft, TaskService, TaskServiceError};
pub use storage::kv::{
    KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult,
};
pub use store::task_store::{
    LoadReport, SkippedRecord, StoreError, StoreResult, TaskStore, TASKS_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
