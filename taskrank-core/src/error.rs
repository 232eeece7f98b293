//! Rejections and recoverable field warnings.
//!
//! A `ValidationError` rejects the whole batch. A `FieldWarning` is only a
//! notice: the scorer already substituted its documented default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No tasks provided")]
    EmptyBatch,

    #[error("Task at index {index} missing title")]
    MissingTitle { index: usize },

    #[error("Unknown strategy: {0} (expected one of smart_balance, fastest_wins, high_impact, deadline_driven)")]
    UnknownStrategy(String),

    #[error("Duplicate task id: {0}")]
    DuplicateTaskId(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// due_date present but not a calendar date; urgency fell back to 50.
    UnparsableDueDate,
    /// estimated_hours <= 0 (or not a number); effort fell back to 50.
    NonPositiveHours,
    /// importance outside 1..=10; clamped.
    ImportanceOutOfRange,
    MissingDueDate,
    MissingEstimatedHours,
    MissingImportance,
}

/// A malformed or missing optional field that was recovered with a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWarning {
    pub task_id: String,
    pub kind: WarningKind,
}

impl FieldWarning {
    pub fn new(task_id: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            task_id: task_id.into(),
            kind,
        }
    }
}
