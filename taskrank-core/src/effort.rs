//! Effort score: shorter tasks are quick wins (0-100, higher = quicker).

use crate::error::WarningKind;

pub const DEFAULT_HOURS: f64 = 5.0;
pub const NEUTRAL_EFFORT: f64 = 50.0;

pub fn effort_score(estimated_hours: Option<f64>) -> f64 {
    let h = estimated_hours.unwrap_or(DEFAULT_HOURS);
    if !h.is_finite() || h <= 0.0 {
        return NEUTRAL_EFFORT;
    }

    let score = if h < 2.0 {
        90.0
    } else if h < 8.0 {
        70.0 - 5.0 * (h - 2.0)
    } else {
        (30.0 - 2.0 * (h - 8.0)).max(10.0)
    };

    score.clamp(0.0, 100.0)
}

pub fn hours_warning(estimated_hours: Option<f64>) -> Option<WarningKind> {
    match estimated_hours {
        None => Some(WarningKind::MissingEstimatedHours),
        Some(h) if !h.is_finite() || h <= 0.0 => Some(WarningKind::NonPositiveHours),
        Some(_) => None,
    }
}
