//! Importance normalization: 1-10 onto 10-100.

use crate::error::WarningKind;

pub const DEFAULT_IMPORTANCE: i64 = 5;

pub fn importance_score(importance: Option<i64>) -> f64 {
    let i = importance.unwrap_or(DEFAULT_IMPORTANCE).clamp(1, 10);
    (i * 10) as f64
}

/// Integer importance from text. Spreadsheets and some clients send "7.0";
/// fractional values round to the nearest integer.
pub fn parse_importance(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(importance_from_f64))
}

/// `None` for NaN or infinity; otherwise rounded (saturating at the i64 range).
pub fn importance_from_f64(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round() as i64)
}

pub fn importance_warning(importance: Option<i64>) -> Option<WarningKind> {
    match importance {
        None => Some(WarningKind::MissingImportance),
        Some(i) if !(1..=10).contains(&i) => Some(WarningKind::ImportanceOutOfRange),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_mapping() {
        assert_eq!(importance_score(Some(1)), 10.0);
        assert_eq!(importance_score(Some(7)), 70.0);
        assert_eq!(importance_score(Some(10)), 100.0);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(importance_score(Some(0)), 10.0);
        assert_eq!(importance_score(Some(15)), 100.0);
        assert_eq!(importance_score(Some(i64::MIN)), 10.0);
        assert_eq!(importance_warning(Some(15)), Some(WarningKind::ImportanceOutOfRange));
    }

    #[test]
    fn test_parse_importance_accepts_integral_text() {
        assert_eq!(parse_importance("7"), Some(7));
        assert_eq!(parse_importance(" 7.0 "), Some(7));
        assert_eq!(parse_importance("8.6"), Some(9));
        assert_eq!(parse_importance("lots"), None);
        assert_eq!(importance_from_f64(f64::NAN), None);
        assert_eq!(importance_from_f64(1e300), Some(i64::MAX));
    }

    #[test]
    fn test_missing_defaults_to_five() {
        assert_eq!(importance_score(None), 50.0);
        assert_eq!(importance_warning(None), Some(WarningKind::MissingImportance));
    }
}
