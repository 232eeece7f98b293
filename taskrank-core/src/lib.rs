//! taskrank-core: task prioritization engine.
//!
//! Scores each task on urgency, importance, effort and how many tasks it
//! blocks, combines them with a strategy's weights, and ranks the batch.

pub mod aggregate;
pub mod dependency;
pub mod effort;
pub mod error;
pub mod explain;
pub mod import;
pub mod importance;
pub mod pipeline;
pub mod strategy;
pub mod task;
pub mod time;
pub mod urgency;

pub use aggregate::{Dimension, ScoreBreakdown, ScoredTask, priority_score};
pub use dependency::{DependencyAnalysis, dependency_score};
pub use effort::effort_score;
pub use error::{FieldWarning, ValidationError, WarningKind};
pub use explain::explain;
pub use import::{parse_tasks_csv, read_tasks_csv};
pub use importance::importance_score;
pub use pipeline::{
    Analysis, AnalysisPipeline, AnalyzeRequest, SUGGESTION_COUNT, Suggestion, Suggestions,
};
pub use strategy::{Strategy, StrategyProfile, StrategyWeights, profiles, resolve_strategy};
pub use task::{Task, TaskInput, assign_task_id, prepare_batch};
pub use urgency::{Urgency, score_urgency, urgency_for_date, urgency_for_offset};
