//! Dashboard state
//!
//! Everything the renderer draws, plus the view router. Only the dashboard
//! loop writes to it.

use crate::api::types::{
    Candidate, CountingSpeed, Party, Predictions, Progress, Region, RegionKind,
};
use crate::consts::cli_consts::{MAX_ACTIVITY_LOGS, NATIONWIDE_NAME, NATIONWIDE_REGION};
use crate::environment::Environment;
use crate::events::Event;
use crate::reconcile::{ComparisonChart, ReconciledSeries, ResultsBoard};
use crate::ui::router::ViewRouter;
use std::collections::VecDeque;
use std::time::Instant;

/// A region the user can pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionChoice {
    pub code: String,
    pub name: String,
    pub kind: RegionKind,
}

impl RegionChoice {
    pub fn nationwide() -> Self {
        Self {
            code: NATIONWIDE_REGION.to_string(),
            name: NATIONWIDE_NAME.to_string(),
            kind: RegionKind::Other,
        }
    }
}

#[derive(Debug)]
pub struct DashboardState {
    pub environment: Environment,
    pub start_time: Instant,
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,

    pub router: ViewRouter,
    /// Nationwide first, then regions (kraje), then districts (okresy).
    pub region_choices: Vec<RegionChoice>,
    pub region_code: String,
    pub connected: bool,
    /// Highlighted row of the comparison checkbox list.
    pub comparison_cursor: usize,

    pub parties: Vec<Party>,
    pub results: ResultsBoard,
    pub progress: Option<Progress>,
    pub predictions: Option<Predictions>,
    pub counting_speed: Option<CountingSpeed>,
    pub timeline: Option<ReconciledSeries>,
    pub total_votes: Option<ReconciledSeries>,
    pub comparison: ComparisonChart,
    pub candidates: Vec<Candidate>,
    /// Wall-clock time of the last results render, `HH:MM:SS`.
    pub last_update: Option<String>,

    pub activity_logs: VecDeque<Event>,
}

impl DashboardState {
    pub fn new(
        environment: Environment,
        region_code: String,
        router: ViewRouter,
        with_background_color: bool,
    ) -> Self {
        Self {
            environment,
            start_time: Instant::now(),
            with_background_color,
            tick: 0,
            router,
            region_choices: vec![RegionChoice::nationwide()],
            region_code,
            connected: false,
            comparison_cursor: 0,
            parties: Vec::new(),
            results: ResultsBoard::default(),
            progress: None,
            predictions: None,
            counting_speed: None,
            timeline: None,
            total_votes: None,
            comparison: ComparisonChart::default(),
            candidates: Vec::new(),
            last_update: None,
            activity_logs: VecDeque::new(),
        }
    }

    /// Replaces the selectable regions with nationwide plus `regions`,
    /// kraje before okresy, each group in backend order.
    pub fn set_regions(&mut self, regions: Vec<Region>) {
        let mut choices = vec![RegionChoice::nationwide()];
        for kind in [RegionKind::Kraj, RegionKind::Okres] {
            choices.extend(
                regions
                    .iter()
                    .filter(|r| r.kind == kind && r.code != NATIONWIDE_REGION)
                    .map(|r| RegionChoice {
                        code: r.code.clone(),
                        name: r.name.clone(),
                        kind: r.kind,
                    }),
            );
        }
        self.region_choices = choices;
        self.comparison_cursor = self
            .comparison_cursor
            .min(self.comparison_choices().len().saturating_sub(1));
    }

    /// Checkbox list of the comparison panel: nationwide and the kraje.
    pub fn comparison_choices(&self) -> Vec<&RegionChoice> {
        self.region_choices
            .iter()
            .filter(|c| c.code == NATIONWIDE_REGION || c.kind == RegionKind::Kraj)
            .collect()
    }

    pub fn region_name(&self) -> &str {
        self.region_choices
            .iter()
            .find(|c| c.code == self.region_code)
            .map(|c| c.name.as_str())
            .unwrap_or(self.region_code.as_str())
    }

    /// Region `step` places away from the active one in the choice list.
    pub fn neighbour_region(&self, step: isize) -> Option<&RegionChoice> {
        let len = self.region_choices.len() as isize;
        if len == 0 {
            return None;
        }
        let index = self
            .region_choices
            .iter()
            .position(|c| c.code == self.region_code)
            .unwrap_or(0) as isize;
        self.region_choices
            .get((index + step).rem_euclid(len) as usize)
    }

    /// Party code after `current` in ballot order; `None` after the last one.
    pub fn next_party_filter(&self, current: Option<&str>) -> Option<String> {
        match current {
            None => self.parties.first().map(|p| p.code.clone()),
            Some(code) => self
                .parties
                .iter()
                .position(|p| p.code == code)
                .and_then(|i| self.parties.get(i + 1))
                .map(|p| p.code.clone()),
        }
    }

    pub fn party_name(&self, code: &str) -> String {
        self.parties
            .iter()
            .find(|p| p.code == code)
            .map(|p| p.short_name.clone().unwrap_or_else(|| p.name.clone()))
            .unwrap_or_else(|| code.to_string())
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: Event) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }
}
