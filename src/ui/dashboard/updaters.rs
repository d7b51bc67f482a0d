//! Dashboard state update logic
//!
//! Applies worker messages to the state and turns user actions into session
//! calls. Both the TUI and the headless loop go through here.

use super::state::DashboardState;
use crate::api::types::{ExportFormat, PartyResult};
use crate::events::{DashboardMessage, Event, EventType, Source};
use crate::logging::LogLevel;
use crate::push::{PushEvent, ServerEvent};
use crate::reconcile::{SeriesKind, aggregate, reconcile};
use crate::session::DashboardSession;
use crate::ui::router::View;
use crate::workers::export::spawn_export;
use crate::workers::fetcher::{FetchRequest, FetchedPayload};
use chrono::Local;
use log::debug;
use std::path::PathBuf;

impl DashboardState {
    /// Advance the animation tick.
    pub fn update(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Applies one message from the shared channel.
    pub fn handle_message(&mut self, session: &mut DashboardSession, message: DashboardMessage) {
        match message {
            DashboardMessage::Activity(event) => {
                if event.should_display() {
                    self.add_to_activity_log(event);
                }
            }
            DashboardMessage::Fetched { scope, payload } => {
                if payload.is_region_scoped() && !session.is_current(&scope) {
                    debug!(
                        "Discarding stale payload for {} (generation {})",
                        scope.region, scope.generation
                    );
                    return;
                }
                self.apply_payload(payload);
            }
            DashboardMessage::Push(event) => self.handle_push(session, event),
            DashboardMessage::RefreshTick => {
                let via = if session.is_connected() { "push" } else { "REST" };
                let event = Event::new(
                    Source::Refresher,
                    format!("Refreshing {} view via {}", self.router.active(), via),
                    EventType::Refresh,
                    LogLevel::Debug,
                );
                if event.should_display() {
                    self.add_to_activity_log(event);
                }
                if let Err(e) = session.refresh_tick(self.router.plan()) {
                    self.log_session_error(&e.to_string());
                }
            }
        }
    }

    fn handle_push(&mut self, session: &mut DashboardSession, event: PushEvent) {
        match event {
            PushEvent::Connected => {
                self.connected = true;
                if let Err(e) = session.on_connected() {
                    self.log_session_error(&e.to_string());
                }
            }
            PushEvent::Disconnected { .. } => {
                self.connected = false;
                session.on_disconnected();
            }
            PushEvent::Server(event) => self.apply_server_event(event),
            PushEvent::Failed(_) => {}
        }
    }

    fn apply_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Update(update) => {
                if update.region_code() != Some(self.region_code.as_str()) {
                    return;
                }
                if let Some(results) = update.results {
                    self.apply_results(&results);
                }
                if let Some(progress) = update.progress {
                    self.progress = Some(progress);
                }
            }
            ServerEvent::TimeSeriesData(push) => {
                if self.is_foreign_region(push.region.as_deref()) {
                    return;
                }
                if let Some(series) = reconcile(&push.time_series, SeriesKind::Percentage) {
                    self.timeline = Some(series);
                }
            }
            ServerEvent::CountingSpeedData(push) => {
                if self.is_foreign_region(push.region.as_deref()) {
                    return;
                }
                self.counting_speed = Some(push.speed);
            }
            ServerEvent::Connected { message } => {
                debug!("Push server greeting: {}", message);
            }
            ServerEvent::Subscribed { region } => {
                self.add_to_activity_log(Event::push(
                    format!("Subscribed to {}", region),
                    EventType::Connection,
                    LogLevel::Debug,
                ));
            }
            ServerEvent::Unsubscribed { region } => {
                debug!("Unsubscribed from {}", region);
            }
            ServerEvent::Error { message } => {
                debug!("Push server error: {}", message);
            }
        }
    }

    fn is_foreign_region(&self, region: Option<&str>) -> bool {
        region.is_some_and(|r| r != self.region_code)
    }

    fn apply_results(&mut self, results: &[PartyResult]) {
        self.results.apply(results);
        self.last_update = Some(Local::now().format("%H:%M:%S").to_string());
    }

    /// Applies a REST payload that is known to belong to the active scope.
    pub fn apply_payload(&mut self, payload: FetchedPayload) {
        match payload {
            FetchedPayload::Regions(regions) => self.set_regions(regions),
            FetchedPayload::Parties(parties) => self.parties = parties,
            FetchedPayload::Results(response) => {
                if let Some(results) = response.results {
                    self.apply_results(&results);
                }
            }
            FetchedPayload::Progress(progress) => self.progress = Some(progress),
            FetchedPayload::Predictions(predictions) => {
                if predictions.parties.is_some() {
                    self.predictions = Some(predictions);
                }
            }
            FetchedPayload::CountingSpeed(speed) => self.counting_speed = Some(speed),
            FetchedPayload::TimeSeries { kind, points } => {
                let Some(series) = reconcile(&points, kind) else {
                    return;
                };
                match kind {
                    SeriesKind::Percentage => self.timeline = Some(series),
                    SeriesKind::TotalVotes => self.total_votes = Some(series),
                }
            }
            FetchedPayload::Comparison { regions, rows } => {
                if regions.as_slice() != self.router.comparison_selection() || rows.is_empty() {
                    return;
                }
                self.comparison = aggregate(&rows);
            }
            FetchedPayload::Candidates(candidates) => self.candidates = candidates,
        }
    }

    /// Loads the static lists and the first view.
    pub fn start(&mut self, session: &mut DashboardSession) {
        session.dispatch(vec![FetchRequest::Regions, FetchRequest::Parties]);
        let view = self.router.active();
        self.enter_view(session, view);
    }

    pub fn enter_view(&mut self, session: &mut DashboardSession, view: View) {
        let plan = self.router.enter(view);
        self.add_to_activity_log(Event::router(format!("Switched to {} view", view)));
        session.dispatch(plan);
    }

    /// Full reload of the active view over REST.
    pub fn refresh(&mut self, session: &mut DashboardSession) {
        session.dispatch(self.router.plan());
    }

    pub fn select_region(&mut self, session: &mut DashboardSession, code: &str) {
        match session.set_region(code) {
            Ok(false) => return,
            Ok(true) => {}
            Err(e) => self.log_session_error(&e.to_string()),
        }
        self.region_code = session.region().to_string();
        // Trends only compare renders of the same region.
        self.results = Default::default();
        self.add_to_activity_log(Event::router(format!(
            "Region changed to {}",
            self.region_name()
        )));
        session.dispatch(self.router.plan());
    }

    pub fn step_region(&mut self, session: &mut DashboardSession, step: isize) {
        if let Some(code) = self.neighbour_region(step).map(|c| c.code.clone()) {
            self.select_region(session, &code);
        }
    }

    pub fn move_comparison_cursor(&mut self, step: isize) {
        let len = self.comparison_choices().len() as isize;
        if len > 0 {
            self.comparison_cursor = (self.comparison_cursor as isize + step).rem_euclid(len) as usize;
        }
    }

    /// Toggles the highlighted comparison checkbox.
    pub fn toggle_comparison(&mut self, session: &mut DashboardSession) {
        let Some(code) = self
            .comparison_choices()
            .get(self.comparison_cursor)
            .map(|c| c.code.clone())
        else {
            return;
        };
        let plan = self.router.toggle_comparison(&code);
        if self.router.comparison_selection().is_empty() {
            self.comparison = Default::default();
        }
        session.dispatch(plan);
    }

    pub fn cycle_range(&mut self, session: &mut DashboardSession, forward: bool) {
        if let Some(plan) = self.router.cycle_range(forward) {
            session.dispatch(plan);
        }
    }

    pub fn cycle_party_filter(&mut self, session: &mut DashboardSession) {
        let next = self.next_party_filter(self.router.party_filter());
        let plan = self.router.set_party_filter(next);
        session.dispatch(plan);
    }

    pub fn export(&mut self, session: &DashboardSession, format: ExportFormat) {
        let fetcher = session.fetcher();
        spawn_export(
            fetcher.api(),
            fetcher.event_sender(),
            session.region().to_string(),
            format,
            PathBuf::from("."),
        );
    }

    fn log_session_error(&mut self, message: &str) {
        self.add_to_activity_log(Event::push(
            message.to_string(),
            EventType::Error,
            LogLevel::Error,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockElectionApi;
    use crate::api::types::{ComparisonRow, Progress, RegionRef, ResultsResponse, TimeSeriesPoint};
    use crate::environment::Environment;
    use crate::push::ClientCommand;
    use crate::push::protocol::UpdatePayload;
    use crate::reconcile::Trend;
    use crate::session::Scope;
    use crate::ui::router::ViewRouter;

    fn state() -> DashboardState {
        DashboardState::new(
            Environment::Local,
            "CZ".to_string(),
            ViewRouter::new(20),
            false,
        )
    }

    fn results(pct: f64) -> Vec<PartyResult> {
        vec![PartyResult {
            party_code: "A".to_string(),
            party_name: "Party A".to_string(),
            votes: 100,
            percentage: pct,
            ..Default::default()
        }]
    }

    fn fetched_results(scope: Scope, pct: f64) -> DashboardMessage {
        DashboardMessage::Fetched {
            scope,
            payload: FetchedPayload::Results(ResultsResponse {
                results: Some(results(pct)),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn test_stale_scope_is_discarded() {
        let (mut session, _commands, _messages) = DashboardSession::for_test(MockElectionApi::new());
        let mut state = state();
        let old_scope = session.scope();

        session.set_region("CZ010").unwrap();
        state.region_code = "CZ010".to_string();

        state.handle_message(&mut session, fetched_results(old_scope, 40.0));
        assert!(state.results.rows().is_empty());

        let scope = session.scope();
        state.handle_message(&mut session, fetched_results(scope, 40.0));
        assert_eq!(state.results.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_two_refreshes_drive_trend() {
        let (mut session, _commands, _messages) = DashboardSession::for_test(MockElectionApi::new());
        let mut state = state();

        let scope = session.scope();
        state.handle_message(&mut session, fetched_results(scope, 40.0));
        assert_eq!(state.results.rows()[0].trend, Trend::Flat);
        let scope = session.scope();
        state.handle_message(&mut session, fetched_results(scope, 40.5));
        assert_eq!(state.results.rows()[0].trend, Trend::Up);
        assert!(state.last_update.is_some());
    }

    #[tokio::test]
    async fn test_push_update_for_other_region_is_ignored() {
        let (mut session, _commands, _messages) = DashboardSession::for_test(MockElectionApi::new());
        let mut state = state();

        let update = |code: &str| {
            DashboardMessage::Push(PushEvent::Server(ServerEvent::Update(UpdatePayload {
                region: Some(RegionRef {
                    code: code.to_string(),
                    name: String::new(),
                }),
                results: Some(results(10.0)),
                progress: Some(Progress {
                    counted_districts: 5,
                    ..Default::default()
                }),
                timestamp: None,
            })))
        };

        state.handle_message(&mut session, update("CZ010"));
        assert!(state.results.rows().is_empty());
        assert!(state.progress.is_none());

        state.handle_message(&mut session, update("CZ"));
        assert_eq!(state.results.rows().len(), 1);
        assert_eq!(state.progress.as_ref().map(|p| p.counted_districts), Some(5));
    }

    #[tokio::test]
    async fn test_push_update_is_ranked_by_votes() {
        let (mut session, _commands, _messages) = DashboardSession::for_test(MockElectionApi::new());
        let mut state = state();
        let party = |code: &str, votes: u64, percentage: f64| PartyResult {
            party_code: code.to_string(),
            party_name: format!("Party {code}"),
            votes,
            percentage,
            ..Default::default()
        };

        state.handle_message(
            &mut session,
            DashboardMessage::Push(PushEvent::Server(ServerEvent::Update(UpdatePayload {
                region: Some(RegionRef {
                    code: "CZ".to_string(),
                    name: String::new(),
                }),
                results: Some(vec![party("SMALL", 100, 10.0), party("BIG", 900, 90.0)]),
                ..Default::default()
            }))),
        );

        let rows = state.results.rows();
        assert_eq!(rows[0].party_code, "BIG");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].party_code, "SMALL");
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_data() {
        let (mut session, _commands, _messages) = DashboardSession::for_test(MockElectionApi::new());
        let mut state = state();
        let scope = session.scope();
        state.handle_message(&mut session, fetched_results(scope, 40.0));

        state.handle_message(
            &mut session,
            DashboardMessage::Push(PushEvent::Server(ServerEvent::Update(UpdatePayload {
                region: Some(RegionRef {
                    code: "CZ".to_string(),
                    name: String::new(),
                }),
                progress: Some(Progress::default()),
                ..Default::default()
            }))),
        );
        assert_eq!(state.results.rows().len(), 1);
        assert!(state.progress.is_some());
    }

    #[tokio::test]
    async fn test_connect_flips_badge_and_subscribes() {
        let (mut session, mut commands, _messages) = DashboardSession::for_test(MockElectionApi::new());
        let mut state = state();

        state.handle_message(&mut session, DashboardMessage::Push(PushEvent::Connected));
        assert!(state.connected);
        assert!(session.is_connected());
        assert_eq!(
            commands.try_recv().unwrap(),
            ClientCommand::Subscribe {
                region: "CZ".to_string()
            }
        );

        state.handle_message(
            &mut session,
            DashboardMessage::Push(PushEvent::Disconnected {
                reason: "gone".to_string(),
            }),
        );
        assert!(!state.connected);
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_empty_time_series_keeps_previous_chart() {
        let mut state = state();
        state.apply_payload(FetchedPayload::TimeSeries {
            kind: SeriesKind::TotalVotes,
            points: vec![TimeSeriesPoint {
                timestamp: "2025-10-04T14:00:00".to_string(),
                ..Default::default()
            }],
        });
        assert!(state.total_votes.is_some());

        state.apply_payload(FetchedPayload::TimeSeries {
            kind: SeriesKind::TotalVotes,
            points: vec![],
        });
        assert!(state.total_votes.is_some());
        assert!(state.timeline.is_none());
    }

    #[tokio::test]
    async fn test_emptied_comparison_clears_chart_without_request() {
        let (mut session, mut commands, mut messages) =
            DashboardSession::for_test(MockElectionApi::new());
        let mut state = state();
        state.router.enter(View::Comparison);
        state.apply_payload(FetchedPayload::Comparison {
            regions: vec!["CZ".to_string()],
            rows: vec![ComparisonRow {
                region_code: "CZ".to_string(),
                region_name: "Česko".to_string(),
                results: results(30.0),
            }],
        });
        assert!(!state.comparison.is_empty());

        // Cursor 0 is the nationwide checkbox.
        state.toggle_comparison(&mut session);
        assert!(state.comparison.is_empty());
        assert!(commands.try_recv().is_err());
        assert!(messages.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_comparison_for_old_selection_is_ignored() {
        let mut state = state();
        state.router.enter(View::Comparison);
        state.apply_payload(FetchedPayload::Comparison {
            regions: vec!["CZ".to_string(), "CZ010".to_string()],
            rows: vec![ComparisonRow::default()],
        });
        assert!(state.comparison.is_empty());
    }

    #[tokio::test]
    async fn test_select_region_resets_trend_and_refetches() {
        let mut api = MockElectionApi::new();
        api.expect_current_results()
            .withf(|region| region == "CZ010")
            .returning(|_| Ok(ResultsResponse::default()));
        api.expect_progress()
            .returning(|_| Ok(Progress::default()));
        api.expect_predictions()
            .returning(|_| Ok(Default::default()));
        api.expect_counting_speed()
            .returning(|_| Ok(Default::default()));
        let (mut session, _commands, mut messages) = DashboardSession::for_test(api);
        let mut state = state();
        let scope = session.scope();
        state.handle_message(&mut session, fetched_results(scope, 40.0));

        state.select_region(&mut session, "CZ010");
        assert_eq!(state.region_code, "CZ010");
        assert!(state.results.snapshot().is_empty());

        let first = tokio::time::timeout(std::time::Duration::from_secs(2), messages.recv())
            .await
            .unwrap();
        match first {
            Some(DashboardMessage::Fetched { scope, .. }) => assert_eq!(scope.region, "CZ010"),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
