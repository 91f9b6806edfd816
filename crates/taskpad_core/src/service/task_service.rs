//! Task use-case service.
//!
//! # Responsibility
//! - Provide the load/save/read entry points the presentation layer calls.
//! - Gate task creation on complete form input.
//!
//! # Invariants
//! - Service APIs never bypass the store's persistence contract.
//! - Draft validation checks absence, not emptiness: a form that delivered
//!   an empty string still saves (matching the creation screen's rules).

use crate::model::task::Task;
use crate::storage::kv::KeyValueStorage;
use crate::store::task_store::{LoadReport, StoreError, TaskStore};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Partial input collected by the create-task form.
///
/// Both fields stay `None` until the user edits the matching control;
/// `save_draft` refuses drafts that never received a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Free-text description, if the text field was edited.
    pub text: Option<String>,
    /// Deadline in epoch milliseconds, if the picker was used.
    pub deadline: Option<i64>,
}

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// The draft never received task text.
    MissingText,
    /// The draft never received a deadline.
    MissingDeadline,
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingText => write!(f, "task text has not been entered"),
            Self::MissingDeadline => write!(f, "task deadline has not been entered"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for TaskServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case service wrapper for the task list.
pub struct TaskService<S: KeyValueStorage> {
    store: TaskStore<S>,
}

impl<S: KeyValueStorage> TaskService<S> {
    /// Creates a service with an empty session over the given storage.
    pub fn new(storage: S) -> Self {
        Self {
            store: TaskStore::new(storage),
        }
    }

    /// Reloads the session's task list from persisted state.
    pub fn reload(&mut self) -> Result<LoadReport, TaskServiceError> {
        Ok(self.store.load()?)
    }

    /// Validates a draft and persists the resulting task.
    ///
    /// # Contract
    /// - Absent text or deadline blocks the save with a typed error the UI
    ///   maps to its missing-input prompts.
    /// - On success the task is appended and the whole list re-persisted.
    pub fn save_draft(&mut self, draft: TaskDraft) -> Result<Task, TaskServiceError> {
        let text = draft.text.ok_or(TaskServiceError::MissingText)?;
        let deadline = draft.deadline.ok_or(TaskServiceError::MissingDeadline)?;

        let task = Task::new(text, deadline);
        self.store.save(task.clone())?;
        Ok(task)
    }

    /// Number of tasks in the current session.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Task at the given zero-based list position, if any.
    pub fn task_at(&self, index: usize) -> Option<&Task> {
        self.store.data_at(index)
    }

    /// Full ordered task list for row rendering.
    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }
}
