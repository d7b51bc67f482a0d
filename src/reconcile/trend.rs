//! Trend indicator for a party's share between two consecutive renders.

use crate::consts::cli_consts::TREND_DEAD_BAND;

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum Trend {
    #[strum(to_string = "up")]
    Up,
    #[strum(to_string = "down")]
    Down,
    #[strum(to_string = "flat")]
    Flat,
}

impl Trend {
    /// Classifies the move from `previous` to `current` (both in percent).
    ///
    /// Changes within ±0.1 points are flat, and so is the first observation.
    pub fn classify(previous: Option<f64>, current: f64) -> Self {
        let Some(previous) = previous else {
            return Trend::Flat;
        };
        let diff = current - previous;
        if diff > TREND_DEAD_BAND {
            Trend::Up
        } else if diff < -TREND_DEAD_BAND {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Flat => "→",
        }
    }
}
