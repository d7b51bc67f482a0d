//! View Router
//!
//! Tracks which panel is active and what each panel needs fetched.

use crate::consts::cli_consts::{ALL_AVAILABLE_HOURS, NATIONWIDE_REGION, TIMELINE_RANGE_HOURS};
use crate::reconcile::SeriesKind;
use crate::workers::fetcher::FetchRequest;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, strum::Display)]
pub enum View {
    #[default]
    #[strum(to_string = "Current")]
    Current,
    #[strum(to_string = "Timeline")]
    Timeline,
    #[strum(to_string = "Total votes")]
    TotalVotes,
    #[strum(to_string = "Comparison")]
    Comparison,
    #[strum(to_string = "Candidates")]
    Candidates,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Current,
        View::Timeline,
        View::TotalVotes,
        View::Comparison,
        View::Candidates,
    ];

    pub fn index(&self) -> usize {
        View::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn previous(&self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

/// Look-back window of a time-series panel.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TimeRange {
    Hours(u32),
    #[default]
    All,
}

impl TimeRange {
    pub fn hours(&self) -> u32 {
        match self {
            TimeRange::Hours(h) => *h,
            TimeRange::All => ALL_AVAILABLE_HOURS,
        }
    }

    fn choices() -> impl Iterator<Item = TimeRange> {
        TIMELINE_RANGE_HOURS
            .into_iter()
            .map(TimeRange::Hours)
            .chain(std::iter::once(TimeRange::All))
    }

    /// Next wider window, wrapping from "all" back to the narrowest.
    pub fn cycle(&self, forward: bool) -> TimeRange {
        let choices: Vec<TimeRange> = Self::choices().collect();
        let index = choices.iter().position(|c| c == self).unwrap_or(0);
        let len = choices.len();
        if forward {
            choices[(index + 1) % len]
        } else {
            choices[(index + len - 1) % len]
        }
    }

    pub fn label(&self) -> String {
        match self {
            TimeRange::Hours(h) => format!("{}h", h),
            TimeRange::All => "all".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewRouter {
    active: View,
    timeline_range: TimeRange,
    total_votes_range: TimeRange,
    comparison: Vec<String>,
    party_filter: Option<String>,
    candidate_limit: u32,
}

impl ViewRouter {
    /// Nationwide starts out selected for comparison.
    pub fn new(candidate_limit: u32) -> Self {
        Self {
            active: View::default(),
            timeline_range: TimeRange::default(),
            total_votes_range: TimeRange::default(),
            comparison: vec![NATIONWIDE_REGION.to_string()],
            party_filter: None,
            candidate_limit,
        }
    }

    pub fn active(&self) -> View {
        self.active
    }

    pub fn comparison_selection(&self) -> &[String] {
        &self.comparison
    }

    pub fn party_filter(&self) -> Option<&str> {
        self.party_filter.as_deref()
    }

    /// Window shown by the active panel, if it has one.
    pub fn range(&self) -> Option<TimeRange> {
        match self.active {
            View::Timeline => Some(self.timeline_range),
            View::TotalVotes => Some(self.total_votes_range),
            _ => None,
        }
    }

    /// Activates `view` and returns what it needs fetched.
    pub fn enter(&mut self, view: View) -> Vec<FetchRequest> {
        self.active = view;
        if view == View::Comparison && self.comparison.is_empty() {
            self.comparison.push(NATIONWIDE_REGION.to_string());
        }
        self.plan()
    }

    /// Fetch plan of the active view.
    pub fn plan(&self) -> Vec<FetchRequest> {
        match self.active {
            View::Current => vec![
                FetchRequest::Results,
                FetchRequest::Progress,
                FetchRequest::Predictions,
                FetchRequest::CountingSpeed,
            ],
            View::Timeline => vec![FetchRequest::TimeSeries {
                kind: SeriesKind::Percentage,
                hours: self.timeline_range.hours(),
            }],
            View::TotalVotes => vec![FetchRequest::TimeSeries {
                kind: SeriesKind::TotalVotes,
                hours: self.total_votes_range.hours(),
            }],
            View::Comparison if self.comparison.is_empty() => Vec::new(),
            View::Comparison => vec![FetchRequest::Comparison {
                regions: self.comparison.clone(),
            }],
            View::Candidates => vec![FetchRequest::Candidates {
                party: self.party_filter.clone(),
                limit: self.candidate_limit,
            }],
        }
    }

    /// Flips `code` in the comparison selection. An empty selection yields an
    /// empty plan.
    pub fn toggle_comparison(&mut self, code: &str) -> Vec<FetchRequest> {
        if let Some(pos) = self.comparison.iter().position(|c| c == code) {
            self.comparison.remove(pos);
        } else {
            self.comparison.push(code.to_string());
        }
        if self.active == View::Comparison {
            self.plan()
        } else {
            Vec::new()
        }
    }

    /// Steps the active panel's window. `None` when the panel has none.
    pub fn cycle_range(&mut self, forward: bool) -> Option<Vec<FetchRequest>> {
        match self.active {
            View::Timeline => self.timeline_range = self.timeline_range.cycle(forward),
            View::TotalVotes => self.total_votes_range = self.total_votes_range.cycle(forward),
            _ => return None,
        }
        Some(self.plan())
    }

    pub fn set_party_filter(&mut self, party: Option<String>) -> Vec<FetchRequest> {
        self.party_filter = party.filter(|p| !p.is_empty());
        if self.active == View::Candidates {
            self.plan()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_plan() {
        let mut router = ViewRouter::new(20);
        assert_eq!(
            router.enter(View::Current),
            vec![
                FetchRequest::Results,
                FetchRequest::Progress,
                FetchRequest::Predictions,
                FetchRequest::CountingSpeed,
            ]
        );
    }

    #[test]
    fn test_time_series_defaults_to_all_available() {
        let mut router = ViewRouter::new(20);
        assert_eq!(
            router.enter(View::TotalVotes),
            vec![FetchRequest::TimeSeries {
                kind: SeriesKind::TotalVotes,
                hours: 168,
            }]
        );
    }

    #[test]
    fn test_ranges_are_per_panel() {
        let mut router = ViewRouter::new(20);
        router.enter(View::Timeline);
        let plan = router.cycle_range(true).unwrap();
        assert_eq!(
            plan,
            vec![FetchRequest::TimeSeries {
                kind: SeriesKind::Percentage,
                hours: 1,
            }]
        );

        router.enter(View::TotalVotes);
        assert_eq!(router.range(), Some(TimeRange::All));
        router.enter(View::Current);
        assert!(router.cycle_range(true).is_none());
    }

    #[test]
    fn test_range_cycle_wraps() {
        assert_eq!(TimeRange::All.cycle(true), TimeRange::Hours(1));
        assert_eq!(TimeRange::Hours(1).cycle(false), TimeRange::All);
        assert_eq!(TimeRange::Hours(6).cycle(true), TimeRange::Hours(24));
    }

    #[test]
    fn test_emptied_comparison_issues_no_request() {
        let mut router = ViewRouter::new(20);
        router.enter(View::Comparison);
        assert_eq!(router.comparison_selection(), ["CZ".to_string()]);

        assert!(router.toggle_comparison("CZ").is_empty());
        assert!(router.comparison_selection().is_empty());
        assert!(router.plan().is_empty());
    }

    #[test]
    fn test_comparison_entry_selects_nationwide_when_empty() {
        let mut router = ViewRouter::new(20);
        router.toggle_comparison("CZ");
        assert!(router.comparison_selection().is_empty());

        let plan = router.enter(View::Comparison);
        assert_eq!(
            plan,
            vec![FetchRequest::Comparison {
                regions: vec!["CZ".to_string()]
            }]
        );
    }

    #[test]
    fn test_comparison_keeps_toggle_order() {
        let mut router = ViewRouter::new(20);
        router.enter(View::Comparison);
        let plan = router.toggle_comparison("CZ010");
        assert_eq!(
            plan,
            vec![FetchRequest::Comparison {
                regions: vec!["CZ".to_string(), "CZ010".to_string()]
            }]
        );
    }

    #[test]
    fn test_party_filter_flows_into_candidates() {
        let mut router = ViewRouter::new(15);
        router.enter(View::Candidates);
        let plan = router.set_party_filter(Some("ANO".to_string()));
        assert_eq!(
            plan,
            vec![FetchRequest::Candidates {
                party: Some("ANO".to_string()),
                limit: 15,
            }]
        );
        assert_eq!(router.set_party_filter(Some(String::new())).len(), 1);
        assert_eq!(router.party_filter(), None);
    }

    #[test]
    fn test_view_cycling() {
        assert_eq!(View::Current.next(), View::Timeline);
        assert_eq!(View::Current.previous(), View::Candidates);
        assert_eq!(View::TotalVotes.to_string(), "Total votes");
    }
}
