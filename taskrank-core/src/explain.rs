//! Human-readable justification for a ranked task.

use crate::aggregate::{Dimension, ScoredTask, round_to};
use crate::strategy::StrategyWeights;

/// Threshold phrase for a dimension, if its value qualifies.
fn reason_for(dim: Dimension, value: f64) -> Option<&'static str> {
    match dim {
        Dimension::Urgency if value > 85.0 => Some("due very soon or overdue"),
        Dimension::Urgency if value > 70.0 => Some("approaching deadline"),
        Dimension::Importance if value >= 80.0 => Some("marked as highly important"),
        Dimension::Effort if value > 80.0 => Some("quick win (low effort)"),
        Dimension::Dependencies if value > 50.0 => Some("unblocks other work"),
        _ => None,
    }
}

fn factor_phrase(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Urgency => "deadline pressure",
        Dimension::Importance => "importance",
        Dimension::Effort => "low effort",
        Dimension::Dependencies => "tasks waiting on it",
    }
}

/// `Ranked #<rank>: <Reasons>. Score: <score>`
///
/// Qualifying reasons are listed dominant factor first (largest weighted
/// contribution). With none, the dominant factor is named instead.
pub fn explain(task: &ScoredTask, rank: usize, weights: &StrategyWeights) -> String {
    let b = &task.score_breakdown;
    let ranked = b.ranked_dimensions(weights);

    let mut reasons: Vec<String> = ranked
        .iter()
        .filter_map(|&dim| reason_for(dim, b.get(dim)))
        .map(str::to_string)
        .collect();

    if reasons.is_empty() {
        reasons.push(format!(
            "good balance of all factors, led by {}",
            factor_phrase(ranked[0])
        ));
    }
    if task.weekend_due {
        reasons.push("due on a weekend".to_string());
    }
    if task.has_circular_dependency {
        reasons.push("has a circular dependency to resolve".to_string());
    }

    format!(
        "Ranked #{}: {}. Score: {}",
        rank,
        capitalize(&reasons.join(", ")),
        round_to(task.priority_score, 2)
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
