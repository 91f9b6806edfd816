//! Task list store over the key-value storage port.
//!
//! # Responsibility
//! - Own the insertion-ordered task sequence for one UI session.
//! - Bridge between that sequence and the persisted `tasks` blob.
//!
//! # Invariants
//! - After a successful `load`, memory mirrors the persisted blob exactly
//!   (skipped malformed records excepted, and those are reported).
//! - After a successful `save`, the blob mirrors memory exactly; the blob
//!   is always rewritten whole, never appended to.
//! - Order is insertion order; the store never reorders tasks.

use crate::model::task::{MalformedRecord, Task};
use crate::storage::kv::{KeyValueStorage, StorageError};
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Well-known storage key holding the serialized task array.
pub const TASKS_KEY: &str = "tasks";

pub type StoreResult<T> = Result<T, StoreError>;

/// Container-level store failure.
///
/// Per-record reconstruction failures are not errors; they are reported
/// through [`LoadReport::skipped`].
#[derive(Debug)]
pub enum StoreError {
    /// The underlying key-value storage failed.
    Storage(StorageError),
    /// The persisted blob is not valid JSON.
    Codec(serde_json::Error),
    /// The persisted blob decoded, but its shape is unusable as a whole.
    CorruptBlob(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "persisted task blob is not valid JSON: {err}"),
            Self::CorruptBlob(details) => {
                write!(f, "persisted task blob is corrupt: {details}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::CorruptBlob(_) => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

/// One persisted record that could not be reconstructed during `load`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Zero-based position of the record in the persisted array.
    pub index: usize,
    /// Why reconstruction failed.
    pub reason: MalformedRecord,
}

/// Outcome summary for a `load` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of tasks reconstructed into memory.
    pub loaded: usize,
    /// Records that were dropped, with their positions and reasons.
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    /// Returns whether every persisted record was reconstructed.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Single source of truth for the task list within one UI session.
///
/// The storage backend is injected so sessions can run over SQLite in the
/// app and over [`crate::storage::kv::MemoryStorage`] in tests.
pub struct TaskStore<S: KeyValueStorage> {
    storage: S,
    tasks: Vec<Task>,
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Creates an empty store over the given storage backend.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            tasks: Vec::new(),
        }
    }

    /// Rebuilds the in-memory sequence from the persisted blob.
    ///
    /// An absent key is an empty list, not an error. Records that cannot be
    /// reconstructed are skipped and reported in the returned
    /// [`LoadReport`]; callers wanting all-or-nothing semantics can inspect
    /// [`LoadReport::skipped`] and discard the session.
    ///
    /// # Contract
    /// - Reloading replaces the previous in-memory sequence, so repeated
    ///   became-visible events never duplicate tasks.
    /// - Does not touch the persisted blob.
    ///
    /// # Errors
    /// - Storage read failures and container-level blob corruption (not
    ///   valid JSON, or top level not an array).
    pub fn load(&mut self) -> StoreResult<LoadReport> {
        let records = match self.storage.get(TASKS_KEY)? {
            None => Vec::new(),
            Some(bytes) => decode_records(&bytes)?,
        };

        let mut loaded = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();
        for (index, element) in records.iter().enumerate() {
            let reconstructed = match element {
                Value::Object(record) => Task::from_record(record),
                _ => Err(MalformedRecord::NotAnObject),
            };
            match reconstructed {
                Ok(task) => loaded.push(task),
                Err(reason) => {
                    warn!(
                        "event=tasks_load module=store status=skipped_record index={index} reason={reason}"
                    );
                    skipped.push(SkippedRecord { index, reason });
                }
            }
        }

        self.tasks = loaded;
        info!(
            "event=tasks_load module=store status=ok loaded={} skipped={}",
            self.tasks.len(),
            skipped.len()
        );
        Ok(LoadReport {
            loaded: self.tasks.len(),
            skipped,
        })
    }

    /// Appends a task and rewrites the whole persisted blob.
    ///
    /// # Contract
    /// - The previous persisted value is fully replaced (last save wins
    ///   across sessions; there is no merging).
    /// - When the storage write fails, the in-memory append is rolled back
    ///   so memory never claims more than the blob holds.
    pub fn save(&mut self, task: Task) -> StoreResult<()> {
        self.tasks.push(task);

        let blob = match encode_tasks(&self.tasks) {
            Ok(blob) => blob,
            Err(err) => {
                self.tasks.pop();
                return Err(StoreError::Codec(err));
            }
        };

        if let Err(err) = self.storage.set(TASKS_KEY, &blob) {
            self.tasks.pop();
            return Err(err.into());
        }

        info!(
            "event=task_save module=store status=ok count={}",
            self.tasks.len()
        );
        Ok(())
    }

    /// Number of tasks currently in memory. No side effects.
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the task at the given zero-based position.
    ///
    /// Out-of-range lookups are a normal outcome (list-view reload races),
    /// answered with `None`, never an error.
    pub fn data_at(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Full ordered view of the in-memory sequence.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

fn decode_records(bytes: &[u8]) -> StoreResult<Vec<Value>> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(elements) => Ok(elements),
        _ => Err(StoreError::CorruptBlob(
            "top-level value is not an array of records",
        )),
    }
}

fn encode_tasks(tasks: &[Task]) -> Result<Vec<u8>, serde_json::Error> {
    // The Serialize derive on `Task` emits exactly the canonical record
    // fields that `Task::from_record` reads back.
    serde_json::to_vec(tasks)
}
