//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record shared by list and create flows.
//! - Convert between in-memory tasks and persisted string-keyed records.
//!
//! # Invariants
//! - Tasks are immutable after construction and carry no identity field;
//!   position in the owning store sequence is the only identity.
//! - `to_record` is the exact inverse of `from_record` for canonical
//!   two-field records.

use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record field holding the to-do description.
pub const FIELD_TEXT: &str = "text";
/// Record field holding the deadline timestamp.
pub const FIELD_DEADLINE: &str = "deadline";

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Free-text description of the to-do.
    pub text: String,
    /// Deadline as a timezone-naive instant in Unix epoch milliseconds.
    pub deadline: i64,
}

/// Error for persisted records that cannot be reconstructed into a `Task`.
///
/// Reconstruction failures are recoverable by design: corrupted records
/// must never abort the process, only the affected record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecord {
    /// A required field is absent from the record.
    MissingField(&'static str),
    /// A required field is present but holds the wrong JSON type.
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    /// The persisted array element is not a string-keyed record at all.
    NotAnObject,
}

impl Display for MalformedRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => {
                write!(f, "task record is missing required field `{field}`")
            }
            Self::WrongType { field, expected } => {
                write!(f, "task record field `{field}` is not a {expected}")
            }
            Self::NotAnObject => write!(f, "persisted array element is not a task record"),
        }
    }
}

impl Error for MalformedRecord {}

impl Task {
    /// Creates a task from raw form input.
    ///
    /// # Contract
    /// - Pure value construction, no validation and no side effects; empty
    ///   text and any timestamp are accepted. Gating incomplete input is
    ///   the job of [`crate::service::task_service::TaskDraft`] validation.
    pub fn new(text: impl Into<String>, deadline: i64) -> Self {
        Self {
            text: text.into(),
            deadline,
        }
    }

    /// Reconstructs a task from its persisted string-keyed record.
    ///
    /// Unknown extra fields are ignored; only the canonical `text` and
    /// `deadline` fields are read.
    ///
    /// # Errors
    /// - [`MalformedRecord::MissingField`] when a required field is absent.
    /// - [`MalformedRecord::WrongType`] when a field holds the wrong type.
    pub fn from_record(record: &Map<String, Value>) -> Result<Self, MalformedRecord> {
        let text = match record.get(FIELD_TEXT) {
            None => return Err(MalformedRecord::MissingField(FIELD_TEXT)),
            Some(Value::String(text)) => text.clone(),
            Some(_) => {
                return Err(MalformedRecord::WrongType {
                    field: FIELD_TEXT,
                    expected: "string",
                })
            }
        };

        let deadline = match record.get(FIELD_DEADLINE) {
            None => return Err(MalformedRecord::MissingField(FIELD_DEADLINE)),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(deadline) => deadline,
                None => {
                    return Err(MalformedRecord::WrongType {
                        field: FIELD_DEADLINE,
                        expected: "integer timestamp",
                    })
                }
            },
            Some(_) => {
                return Err(MalformedRecord::WrongType {
                    field: FIELD_DEADLINE,
                    expected: "integer timestamp",
                })
            }
        };

        Ok(Self { text, deadline })
    }

    /// Serializes this task to its canonical persisted record shape.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(FIELD_TEXT.to_string(), Value::String(self.text.clone()));
        record.insert(FIELD_DEADLINE.to_string(), Value::from(self.deadline));
        record
    }
}
