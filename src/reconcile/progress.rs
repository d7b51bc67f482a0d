//! Counting-speed derived figures.

use crate::api::types::CountingSpeed;
use chrono::{DateTime, Duration, TimeZone};

/// Wall-clock time at which counting should finish at the current pace.
///
/// `None` when the backend has no estimate (zero, negative or non-finite hours).
pub fn estimated_completion<Tz: TimeZone>(
    speed: &CountingSpeed,
    now: DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let hours = speed.estimated_hours;
    if !hours.is_finite() || hours <= 0.0 {
        return None;
    }
    let minutes = (hours * 60.0).round() as i64;
    now.checked_add_signed(Duration::minutes(minutes))
}

/// Human label for the remaining time, e.g. `2h 15m`.
pub fn remaining_label(speed: &CountingSpeed) -> String {
    let hours = speed.estimated_hours;
    if !hours.is_finite() || hours <= 0.0 {
        return "-".to_string();
    }
    let total_minutes = (hours * 60.0).round() as u64;
    match (total_minutes / 60, total_minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn speed(hours: f64) -> CountingSpeed {
        CountingSpeed {
            districts_per_hour: 120.0,
            estimated_hours: hours,
            ..Default::default()
        }
    }

    #[test]
    fn test_estimated_completion() {
        let now = Utc.with_ymd_and_hms(2025, 10, 4, 15, 0, 0).unwrap();
        let eta = estimated_completion(&speed(2.25), now).unwrap();
        assert_eq!(eta, Utc.with_ymd_and_hms(2025, 10, 4, 17, 15, 0).unwrap());
    }

    #[test]
    fn test_no_estimate() {
        let now = Utc.with_ymd_and_hms(2025, 10, 4, 15, 0, 0).unwrap();
        assert!(estimated_completion(&speed(0.0), now).is_none());
        assert!(estimated_completion(&speed(f64::INFINITY), now).is_none());
        assert_eq!(remaining_label(&speed(-1.0)), "-");
    }

    #[test]
    fn test_remaining_label() {
        assert_eq!(remaining_label(&speed(0.5)), "30m");
        assert_eq!(remaining_label(&speed(2.25)), "2h 15m");
    }
}
