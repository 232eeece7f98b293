//! Weighted aggregation of the four dimension scores.

use crate::strategy::StrategyWeights;
use crate::task::Task;
use serde::{Deserialize, Serialize, Serializer};

/// Per-dimension scores. Urgency is 0-200; the rest are 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(serialize_with = "round1")]
    pub urgency: f64,
    #[serde(serialize_with = "round1")]
    pub importance: f64,
    #[serde(serialize_with = "round1")]
    pub effort: f64,
    #[serde(serialize_with = "round1")]
    pub dependencies: f64,
}

/// Which dimension a breakdown value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Urgency,
    Importance,
    Effort,
    Dependencies,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Urgency,
        Dimension::Importance,
        Dimension::Effort,
        Dimension::Dependencies,
    ];
}

impl ScoreBreakdown {
    pub fn get(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::Urgency => self.urgency,
            Dimension::Importance => self.importance,
            Dimension::Effort => self.effort,
            Dimension::Dependencies => self.dependencies,
        }
    }

    /// Value times weight for one dimension.
    pub fn contribution(&self, dim: Dimension, weights: &StrategyWeights) -> f64 {
        let w = match dim {
            Dimension::Urgency => weights.urgency,
            Dimension::Importance => weights.importance,
            Dimension::Effort => weights.effort,
            Dimension::Dependencies => weights.dependencies,
        };
        self.get(dim) * w
    }

    /// Dimensions ordered by contribution, largest first. Ties keep
    /// urgency/importance/effort/dependencies order.
    pub fn ranked_dimensions(&self, weights: &StrategyWeights) -> [Dimension; 4] {
        let mut dims = Dimension::ALL;
        dims.sort_by(|a, b| {
            self.contribution(*b, weights)
                .total_cmp(&self.contribution(*a, weights))
        });
        dims
    }
}

/// `urgency*w_u + importance*w_i + effort*w_e + dependencies*w_d`.
pub fn priority_score(breakdown: &ScoreBreakdown, weights: &StrategyWeights) -> f64 {
    breakdown.urgency * weights.urgency
        + breakdown.importance * weights.importance
        + breakdown.effort * weights.effort
        + breakdown.dependencies * weights.dependencies
}

/// A task with its computed scores attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    #[serde(serialize_with = "round2")]
    pub priority_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub has_circular_dependency: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub weekend_due: bool,
}

/// Stable sort, highest score first; equal scores keep input order.
pub fn sort_by_priority(tasks: &mut [ScoredTask]) {
    tasks.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn round1<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(round_to(*value, 1))
}

fn round2<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(round_to(*value, 2))
}
