//! Analysis pipeline: batch in, ranked tasks (analyze) or top picks (suggest) out.
//!
//! Every call works on its own batch; the pipeline only holds "today" and the
//! fallback strategy, so one instance can serve concurrent requests.

use crate::aggregate::{ScoreBreakdown, ScoredTask, priority_score, sort_by_priority};
use crate::dependency::DependencyAnalysis;
use crate::effort::{effort_score, hours_warning};
use crate::error::{FieldWarning, Result, ValidationError};
use crate::explain::explain;
use crate::importance::{importance_score, importance_warning};
use crate::strategy::Strategy;
use crate::task::{Task, TaskInput, prepare_batch};
use crate::urgency::{due_date_warning, score_urgency};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Number of recommendations `suggest` returns (fewer when the batch is smaller).
pub const SUGGESTION_COUNT: usize = 3;

/// Request body shared by analyze and suggest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub tasks: Vec<TaskInput>,
    #[serde(default)]
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub tasks: Vec<ScoredTask>,
    pub strategy: Strategy,
    pub total_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FieldWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub rank: usize,
    pub task: ScoredTask,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub suggestions: Vec<Suggestion>,
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FieldWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisPipeline {
    today: NaiveDate,
    default_strategy: Strategy,
}

impl AnalysisPipeline {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            default_strategy: Strategy::default(),
        }
    }

    /// Strategy used when a request does not name one.
    pub fn with_default_strategy(mut self, strategy: Strategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Score and sort a validated batch.
    pub fn analyze(&self, tasks: &[Task], strategy: Strategy) -> Result<Analysis> {
        let (scored, warnings) = self.rank(tasks, strategy)?;
        Ok(Analysis {
            total_count: scored.len(),
            tasks: scored,
            strategy,
            warnings,
        })
    }

    /// Top `SUGGESTION_COUNT` tasks with explanations.
    pub fn suggest(&self, tasks: &[Task], strategy: Strategy) -> Result<Suggestions> {
        let (scored, warnings) = self.rank(tasks, strategy)?;
        let weights = strategy.weights();

        let suggestions = scored
            .into_iter()
            .take(SUGGESTION_COUNT)
            .enumerate()
            .map(|(i, task)| {
                let rank = i + 1;
                let explanation = explain(&task, rank, &weights);
                Suggestion {
                    rank,
                    task,
                    explanation,
                }
            })
            .collect();

        Ok(Suggestions {
            suggestions,
            strategy,
            warnings,
        })
    }

    pub fn analyze_request(&self, req: AnalyzeRequest) -> Result<Analysis> {
        let (tasks, strategy) = self.resolve(req)?;
        self.analyze(&tasks, strategy)
    }

    pub fn suggest_request(&self, req: AnalyzeRequest) -> Result<Suggestions> {
        let (tasks, strategy) = self.resolve(req)?;
        self.suggest(&tasks, strategy)
    }

    fn resolve(&self, req: AnalyzeRequest) -> Result<(Vec<Task>, Strategy)> {
        let tasks = prepare_batch(req.tasks)?;
        let strategy = match req.strategy.as_deref() {
            None => self.default_strategy,
            Some(name) => name.parse()?,
        };
        Ok((tasks, strategy))
    }

    fn rank(
        &self,
        tasks: &[Task],
        strategy: Strategy,
    ) -> Result<(Vec<ScoredTask>, Vec<FieldWarning>)> {
        if tasks.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        let graph = DependencyAnalysis::analyze(tasks);
        for group in graph.cycle_groups() {
            warn!(tasks = ?group, "circular dependency detected");
        }

        let weights = strategy.weights();
        let mut warnings = Vec::new();
        let mut scored = Vec::with_capacity(tasks.len());

        for (i, task) in tasks.iter().enumerate() {
            let checks = [
                due_date_warning(task.due_date.as_deref()),
                hours_warning(task.estimated_hours),
                importance_warning(task.importance),
            ];
            for kind in checks.into_iter().flatten() {
                debug!(task = %task.id, ?kind, "recovered field with default");
                warnings.push(FieldWarning::new(task.id.clone(), kind));
            }

            let urgency = score_urgency(task.due_date.as_deref(), self.today);
            let breakdown = ScoreBreakdown {
                urgency: urgency.score,
                importance: importance_score(task.importance),
                effort: effort_score(task.estimated_hours),
                dependencies: graph.score(i),
            };
            let score = priority_score(&breakdown, &weights);
            debug!(task = %task.id, score, ?breakdown, "scored");

            scored.push(ScoredTask {
                task: task.clone(),
                priority_score: score,
                score_breakdown: breakdown,
                has_circular_dependency: graph.has_circular_dependency(i),
                weekend_due: urgency.weekend_due,
            });
        }

        sort_by_priority(&mut scored);
        info!(
            %strategy,
            total = scored.len(),
            cycles = graph.cycle_groups().len(),
            "analysis complete"
        );

        Ok((scored, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urgency::due_in;

    fn today() -> NaiveDate {
        // Wednesday
        NaiveDate::from_ymd_opt(2026, 2, 18).unwrap()
    }

    fn pipeline() -> AnalysisPipeline {
        AnalysisPipeline::new(today())
    }

    #[test]
    fn test_reference_example_scores_79_75() {
        let t = Task::new("1", "Ship it")
            .with_due_date(due_in(today(), 0))
            .with_hours(1.0)
            .with_importance(9);
        let a = pipeline().analyze(&[t], Strategy::SmartBalance).unwrap();
        let s = &a.tasks[0];
        assert_eq!(s.score_breakdown.urgency, 95.0);
        assert_eq!(s.score_breakdown.importance, 90.0);
        assert_eq!(s.score_breakdown.effort, 90.0);
        assert_eq!(s.score_breakdown.dependencies, 30.0);
        assert!((s.priority_score - 79.75).abs() < 1e-9);
        assert!(a.warnings.is_empty());
    }

    #[test]
    fn test_empty_batch_is_validation_error() {
        assert_eq!(
            pipeline().analyze(&[], Strategy::SmartBalance),
            Err(ValidationError::EmptyBatch)
        );
        assert_eq!(
            pipeline().suggest_request(AnalyzeRequest::default()),
            Err(ValidationError::EmptyBatch)
        );
    }

    #[test]
    fn test_sorted_descending_and_count_echoed() {
        let tasks = vec![
            Task::new("low", "Low")
                .with_due_date(due_in(today(), 30))
                .with_hours(10.0)
                .with_importance(3),
            Task::new("high", "High")
                .with_due_date(due_in(today(), 0))
                .with_hours(1.0)
                .with_importance(9),
        ];
        let a = pipeline().analyze(&tasks, Strategy::DeadlineDriven).unwrap();
        assert_eq!(a.total_count, 2);
        assert_eq!(a.strategy, Strategy::DeadlineDriven);
        assert_eq!(a.tasks[0].task.id, "high");
        assert!(a.tasks[0].priority_score > a.tasks[1].priority_score);
    }

    #[test]
    fn test_missing_fields_recovered_with_warnings() {
        let a = pipeline()
            .analyze(&[Task::new("1", "Incomplete")], Strategy::SmartBalance)
            .unwrap();
        let b = a.tasks[0].score_breakdown;
        assert_eq!((b.urgency, b.importance, b.effort, b.dependencies), (20.0, 50.0, 55.0, 30.0));
        assert!(a.tasks[0].priority_score > 0.0);
        assert_eq!(a.warnings.len(), 3);
    }

    #[test]
    fn test_request_strategy_resolution() {
        let req = AnalyzeRequest {
            tasks: vec![Task::new("1", "x").into()],
            strategy: None,
        };
        let p = pipeline().with_default_strategy(Strategy::HighImpact);
        assert_eq!(p.analyze_request(req.clone()).unwrap().strategy, Strategy::HighImpact);

        let unknown = AnalyzeRequest {
            strategy: Some("chaos".into()),
            ..req
        };
        assert_eq!(
            p.analyze_request(unknown),
            Err(ValidationError::UnknownStrategy("chaos".into()))
        );
    }

    #[test]
    fn test_suggest_fewer_than_three() {
        let tasks = vec![Task::new("a", "A"), Task::new("b", "B").with_importance(9)];
        let s = pipeline().suggest(&tasks, Strategy::SmartBalance).unwrap();
        assert_eq!(s.suggestions.len(), 2);
        assert_eq!(s.suggestions[0].task.task.id, "b");
        assert_eq!(s.suggestions[1].rank, 2);
    }

    #[test]
    fn test_blocking_task_gets_dependency_boost() {
        let tasks = vec![
            Task::new("base", "Base"),
            Task::new("x", "X").depends_on("base"),
            Task::new("y", "Y").depends_on("base"),
        ];
        let a = pipeline().analyze(&tasks, Strategy::SmartBalance).unwrap();
        assert_eq!(a.tasks[0].task.id, "base");
        assert_eq!(a.tasks[0].score_breakdown.dependencies, 80.0);
    }
}
