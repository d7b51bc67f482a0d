//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Source;
use crate::reconcile::Trend;
use ratatui::prelude::Color;

/// Line colours for party series, assigned by rank.
const PARTY_PALETTE: [Color; 10] = [
    Color::Rgb(102, 126, 234),
    Color::Rgb(240, 147, 251),
    Color::Rgb(79, 172, 254),
    Color::Rgb(67, 233, 123),
    Color::Rgb(250, 112, 154),
    Color::Rgb(254, 225, 64),
    Color::Rgb(48, 207, 208),
    Color::Rgb(168, 237, 234),
    Color::Rgb(255, 154, 86),
    Color::Rgb(118, 75, 162),
];

pub fn party_color(index: usize) -> Color {
    PARTY_PALETTE[index % PARTY_PALETTE.len()]
}

/// Get a ratatui color for an event source
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Fetcher => Color::Cyan,
        Source::PushChannel => Color::LightMagenta,
        Source::Refresher => Color::Blue,
        Source::Router => Color::Gray,
        Source::Export => Color::Green,
    }
}

pub fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => Color::LightGreen,
        Trend::Down => Color::LightRed,
        Trend::Flat => Color::DarkGray,
    }
}

/// Groups thousands with spaces, e.g. `1 234 567`.
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    if msg.contains("Reqwest error") && msg.contains("timed out") {
        return "Request timed out - will retry on next refresh".to_string();
    }
    if msg.contains("Reqwest error") && msg.contains("connect") {
        return "Backend unreachable - will retry on next refresh".to_string();
    }
    msg.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1 000");
        assert_eq!(format_number(1234567), "1 234 567");
    }

    #[test]
    fn test_format_compact_timestamp() {
        assert_eq!(format_compact_timestamp("2025-10-04 14:05:33"), "10-04 14:05");
        assert_eq!(format_compact_timestamp("garbage"), "garbage");
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(party_color(0), party_color(10));
    }
}
