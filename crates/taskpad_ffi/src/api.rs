//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for the single-screen UI.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Return values are UTF-8 strings with stable meaning.

use std::path::PathBuf;
use std::sync::OnceLock;
use taskpad_core::db::open_db;
use taskpad_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    SqliteStorage, TaskDraft, TaskService, TaskServiceError,
};

const TASK_DB_FILE_NAME: &str = "taskpad.sqlite3";
/// Row label format the list cell renders under the task text.
const DEADLINE_LABEL_FORMAT: &str = "%Y/%m/%d";
/// Format the create form writes into its deadline text field.
const DEADLINE_DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

const SAVED_MESSAGE: &str = "Task saved.";
const MISSING_TEXT_PROMPT: &str = "Please enter a task.";
const MISSING_DEADLINE_PROMPT: &str = "Please enter a deadline.";

static TASK_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListItem {
    /// Free-text task description.
    pub text: String,
    /// Deadline as Unix epoch milliseconds.
    pub deadline_epoch_ms: i64,
    /// Deadline pre-formatted for the list cell (`yyyy/MM/dd`).
    pub deadline_label: String,
}

/// Response envelope for the list-view load flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    /// Tasks in saved order (empty on failure or empty store).
    pub items: Vec<TaskListItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
    /// Number of persisted records dropped as malformed during the load.
    pub skipped: u32,
}

/// Generic action response envelope for the create-task flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI alerts.
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Loads the persisted task list for row rendering.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Rows are returned in saved order; malformed persisted records are
///   dropped and counted in `skipped` rather than failing the whole list.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list() -> TaskListResponse {
    let loaded = with_task_service(|service| {
        let report = service.reload()?;
        let items = service
            .tasks()
            .iter()
            .map(|task| TaskListItem {
                text: task.text.clone(),
                deadline_epoch_ms: task.deadline,
                deadline_label: format_deadline(task.deadline, DEADLINE_LABEL_FORMAT),
            })
            .collect::<Vec<_>>();
        Ok((items, report.skipped.len()))
    });

    match loaded {
        Ok((items, skipped)) => {
            let message = if items.is_empty() {
                "No tasks yet.".to_string()
            } else {
                format!("Loaded {} task(s).", items.len())
            };
            TaskListResponse {
                items,
                message,
                skipped: skipped as u32,
            }
        }
        Err(message) => TaskListResponse {
            items: Vec::new(),
            message: format!("task_list failed: {message}"),
            skipped: 0,
        },
    }
}

/// Number of persisted tasks, for row-count probes.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; returns 0 when the store cannot be read (the failure is
///   logged, and `task_list` carries the error message).
#[flutter_rust_bridge::frb(sync)]
pub fn task_count() -> u32 {
    match with_task_service(|service| {
        service.reload()?;
        Ok(service.count())
    }) {
        Ok(count) => count as u32,
        Err(message) => {
            log::warn!("event=task_count module=ffi status=error error={message}");
            0
        }
    }
}

/// Creates a task from the create-form's draft input.
///
/// Both arguments stay `None` until the matching form control was edited;
/// incomplete drafts are rejected with the form's prompt strings.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns `ok=false` with a prompt message for incomplete input.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(text: Option<String>, deadline_epoch_ms: Option<i64>) -> TaskActionResponse {
    let saved = with_task_service(|service| {
        service.reload()?;
        service.save_draft(TaskDraft {
            text,
            deadline: deadline_epoch_ms,
        })
    });

    match saved {
        Ok(_) => TaskActionResponse::success(SAVED_MESSAGE),
        Err(WithServiceError::Service(TaskServiceError::MissingText)) => {
            TaskActionResponse::failure(MISSING_TEXT_PROMPT)
        }
        Err(WithServiceError::Service(TaskServiceError::MissingDeadline)) => {
            TaskActionResponse::failure(MISSING_DEADLINE_PROMPT)
        }
        Err(err) => TaskActionResponse::failure(format!("task_create failed: {err}")),
    }
}

/// Formats a deadline the way the create form's picker field displays it.
///
/// # FFI contract
/// - Sync call, non-blocking, never panics.
/// - Out-of-range instants degrade to a raw epoch representation.
#[flutter_rust_bridge::frb(sync)]
pub fn deadline_display(epoch_ms: i64) -> String {
    format_deadline(epoch_ms, DEADLINE_DISPLAY_FORMAT)
}

fn format_deadline(epoch_ms: i64, format: &str) -> String {
    match chrono::DateTime::from_timestamp_millis(epoch_ms) {
        Some(instant) => instant.naive_utc().format(format).to_string(),
        // chrono rejects instants outside its representable range; keep
        // something renderable instead of panicking across the boundary.
        None => format!("epoch_ms={epoch_ms}"),
    }
}

/// Infrastructure or use-case failure inside a service call.
#[derive(Debug)]
enum WithServiceError {
    Infra(String),
    Service(TaskServiceError),
}

impl std::fmt::Display for WithServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infra(message) => write!(f, "{message}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl From<TaskServiceError> for WithServiceError {
    fn from(value: TaskServiceError) -> Self {
        Self::Service(value)
    }
}

fn resolve_task_db_path() -> PathBuf {
    TASK_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TASKPAD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(TASK_DB_FILE_NAME)
        })
        .clone()
}

fn with_task_service<T>(
    f: impl FnOnce(&mut TaskService<SqliteStorage<'_>>) -> Result<T, TaskServiceError>,
) -> Result<T, WithServiceError> {
    let db_path = resolve_task_db_path();
    let conn = open_db(&db_path)
        .map_err(|err| WithServiceError::Infra(format!("task DB open failed: {err}")))?;
    let storage = SqliteStorage::try_new(&conn)
        .map_err(|err| WithServiceError::Infra(format!("task storage init failed: {err}")))?;
    let mut service = TaskService::new(storage);
    f(&mut service).map_err(WithServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, deadline_display, init_logging, ping, task_count, task_create, task_list,
    };
    use std::sync::{Mutex, MutexGuard};
    use std::time::{SystemTime, UNIX_EPOCH};
    use taskpad_core::db::open_db;
    use taskpad_core::TASKS_KEY;

    // The process database has full-overwrite save semantics; writing tests
    // must not interleave or they lose each other's updates.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    fn db_guard() -> MutexGuard<'static, ()> {
        DB_LOCK.lock().unwrap_or_else(|err| err.into_inner())
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn task_create_without_text_returns_text_prompt() {
        let response = task_create(None, Some(1_704_099_600_000));
        assert!(!response.ok);
        assert_eq!(response.message, "Please enter a task.");
    }

    #[test]
    fn task_create_without_deadline_returns_deadline_prompt() {
        let response = task_create(Some("no deadline".to_string()), None);
        assert!(!response.ok);
        assert_eq!(response.message, "Please enter a deadline.");
    }

    #[test]
    fn task_create_then_list_finds_saved_task() {
        let _guard = db_guard();
        let token = unique_token("ffi-create");
        let created = task_create(Some(token.clone()), Some(1_704_099_600_000));
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.message, "Task saved.");

        let response = task_list();
        let row = response
            .items
            .iter()
            .find(|item| item.text == token)
            .expect("created task should appear in the list");
        assert_eq!(row.deadline_epoch_ms, 1_704_099_600_000);
        assert_eq!(row.deadline_label, "2024/01/01");
    }

    #[test]
    fn task_count_reports_persisted_tasks() {
        let _guard = db_guard();
        let token = unique_token("ffi-count");
        let created = task_create(Some(token), Some(42));
        assert!(created.ok, "{}", created.message);

        assert!(task_count() >= 1);
        assert_eq!(task_count() as usize, task_list().items.len());
    }

    #[test]
    fn task_create_persists_canonical_records_in_kv_blob() {
        let _guard = db_guard();
        let token = unique_token("ffi-blob");
        let created = task_create(Some(token.clone()), Some(7));
        assert!(created.ok, "{}", created.message);

        let conn = open_db(super::resolve_task_db_path()).expect("open db");
        let blob: Vec<u8> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1;", [TASKS_KEY], |row| {
                row.get(0)
            })
            .expect("query tasks blob");
        let value: serde_json::Value = serde_json::from_slice(&blob).expect("blob is JSON");

        let records = value.as_array().expect("blob is an array");
        let record = records
            .iter()
            .find(|record| record["text"] == token.as_str())
            .expect("created task is in the blob");
        assert_eq!(record["deadline"], 7);
        assert_eq!(record.as_object().unwrap().len(), 2);
    }

    #[test]
    fn deadline_display_uses_picker_format() {
        assert_eq!(deadline_display(0), "1970/01/01 00:00");
        assert_eq!(deadline_display(1_704_099_600_000), "2024/01/01 09:00");
    }

    #[test]
    fn deadline_display_degrades_for_out_of_range_instants() {
        let label = deadline_display(i64::MAX);
        assert!(label.contains("epoch_ms="));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
