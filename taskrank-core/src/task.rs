//! Task records: the loose wire shape and the validated batch the engine scores.

use crate::error::{Result, ValidationError};
use crate::importance::{importance_from_f64, parse_importance};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Task as submitted by a caller. Every field is optional on the wire;
/// `prepare_batch` decides what is fatal and what gets a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// Integers, integral floats like `8.0` and numeric strings are all
    /// accepted; anything else reads as absent.
    #[serde(default, deserialize_with = "lenient_importance")]
    pub importance: Option<i64>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn lenient_importance<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ImportanceVisitor;

    impl<'de> Visitor<'de> for ImportanceVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an importance number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(i64::try_from(v).unwrap_or(i64::MAX)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
            Ok(importance_from_f64(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
            Ok(parse_importance(v))
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(
            self,
            deserializer: D2,
        ) -> std::result::Result<Self::Value, D2::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_option(ImportanceVisitor)
}

/// Validated task. Immutable once a batch is prepared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    /// Raw due date as supplied. Parsed at scoring time so that a bad value
    /// degrades to a neutral urgency instead of rejecting the batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Nominally 1-10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<i64>,

    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: None,
            estimated_hours: None,
            importance: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }
}

impl From<Task> for TaskInput {
    fn from(t: Task) -> Self {
        Self {
            id: Some(t.id),
            title: Some(t.title),
            due_date: t.due_date,
            estimated_hours: t.estimated_hours,
            importance: t.importance,
            dependencies: t.dependencies,
        }
    }
}

/// Id given to a record that arrived without one: `task-<n>`, 1-based batch position.
pub fn assign_task_id(position: usize) -> String {
    format!("task-{}", position + 1)
}

/// `assign_task_id(position)`, or `task-<n>-<k>` with the smallest `k >= 2`
/// that is not yet taken. Records the id as taken.
fn free_task_id(position: usize, taken: &mut HashSet<String>) -> String {
    let base = assign_task_id(position);
    let mut id = base.clone();
    let mut k = 1;
    while taken.contains(&id) {
        k += 1;
        id = format!("{base}-{k}");
    }
    taken.insert(id.clone());
    id
}

fn explicit_id(input: &TaskInput) -> Option<String> {
    input
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validate raw inputs into a scoring batch.
///
/// Rejects an empty batch, a record without a non-blank title, and two
/// records carrying the same explicit id. Records without an id get one from
/// `free_task_id`, which steps around every explicit id in the batch.
pub fn prepare_batch(inputs: Vec<TaskInput>) -> Result<Vec<Task>> {
    if inputs.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    let mut taken: HashSet<String> = HashSet::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        if !input.title.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            return Err(ValidationError::MissingTitle { index });
        }
        if let Some(id) = explicit_id(input) {
            if !taken.insert(id.clone()) {
                return Err(ValidationError::DuplicateTaskId(id));
            }
        }
    }

    let mut out = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let id = match explicit_id(&input) {
            Some(id) => id,
            None => free_task_id(index, &mut taken),
        };

        out.push(Task {
            id,
            title: input.title.unwrap_or_default(),
            due_date: input.due_date.filter(|s| !s.trim().is_empty()),
            estimated_hours: input.estimated_hours,
            importance: input.importance,
            dependencies: input.dependencies,
        });
    }

    Ok(out)
}
