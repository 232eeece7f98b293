//! Due-date urgency: 0-200, highest for overdue work.
//!
//! Buckets by whole days until due (`d`):
//! - d < 0: 100 + 5/day overdue, capped at 200
//! - d = 0..=1: 95
//! - d = 2..=7: 85, -2/day
//! - d = 8..=14: 70, -3/day
//! - d = 15..=30: 50, -2/day
//! - d > 30: 20, -0.5/day, floor 5
//!
//! A due date on Saturday/Sunday is always flagged, but it only loses
//! `WEEKEND_PENALTY` inside d = 2..=29. This departs from a flat penalty on
//! every weekend date: at d = 0..=1 and past d = 29 the buckets step by less
//! than 2 points per day (or not at all), so a flat cut would rank a weekend
//! below the weekday after it. Inside the window every day-to-day step is at
//! least 2, and the adjusted score stays non-increasing across consecutive
//! dates.

use crate::error::WarningKind;
use crate::time::{days_until, is_weekend, parse_due_date};
use chrono::{Duration, NaiveDate};

pub const MAX_URGENCY: f64 = 200.0;

/// Urgency for a due date that is present but not a calendar date.
pub const NEUTRAL_URGENCY: f64 = 50.0;

/// A missing due date is scored as if due this many days out.
pub const DEFAULT_HORIZON_DAYS: i64 = 30;

pub const WEEKEND_PENALTY: f64 = 2.0;
const WEEKEND_PENALTY_DAYS: std::ops::RangeInclusive<i64> = 2..=29;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Urgency {
    pub score: f64,
    pub weekend_due: bool,
}

/// Piecewise urgency for a due-date offset in days, before weekend adjustment.
pub fn urgency_for_offset(days: i64) -> f64 {
    match days {
        d if d < 0 => (100.0 + 5.0 * d.saturating_neg() as f64).min(MAX_URGENCY),
        0 | 1 => 95.0,
        2..=7 => 85.0 - 2.0 * (days - 2) as f64,
        8..=14 => 70.0 - 3.0 * (days - 8) as f64,
        15..=30 => 50.0 - 2.0 * (days - 15) as f64,
        _ => (20.0 - 0.5 * (days - 30) as f64).max(5.0),
    }
}

/// Urgency for a concrete due date, including the weekend adjustment.
pub fn urgency_for_date(due: NaiveDate, today: NaiveDate) -> Urgency {
    let days = days_until(due, today);
    let weekend_due = is_weekend(due);

    let mut score = urgency_for_offset(days);
    if weekend_due && WEEKEND_PENALTY_DAYS.contains(&days) {
        score = (score - WEEKEND_PENALTY).max(0.0);
    }

    Urgency {
        score: score.clamp(0.0, MAX_URGENCY),
        weekend_due,
    }
}

/// Urgency for a task's raw due date.
pub fn score_urgency(due_date: Option<&str>, today: NaiveDate) -> Urgency {
    match due_date {
        None => Urgency {
            // Synthetic horizon: never a weekend flag, it isn't the task's date.
            score: urgency_for_offset(DEFAULT_HORIZON_DAYS),
            weekend_due: false,
        },
        Some(raw) => match parse_due_date(raw) {
            Some(due) => urgency_for_date(due, today),
            None => Urgency {
                score: NEUTRAL_URGENCY,
                weekend_due: false,
            },
        },
    }
}

pub fn due_date_warning(due_date: Option<&str>) -> Option<WarningKind> {
    match due_date {
        None => Some(WarningKind::MissingDueDate),
        Some(raw) if parse_due_date(raw).is_none() => Some(WarningKind::UnparsableDueDate),
        Some(_) => None,
    }
}

/// Convenience for building due dates relative to `today` in tests and demos.
pub fn due_in(today: NaiveDate, days: i64) -> String {
    (today + Duration::days(days)).format("%Y-%m-%d").to_string()
}
