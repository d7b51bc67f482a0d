//! Client session
//!
//! The one place that knows which region is active, whether the push channel
//! is up, and which generation of fetches is still wanted.

use crate::push::{ClientCommand, PushError, PushHandle};
use crate::reconcile::SeriesKind;
use crate::workers::fetcher::{FetchRequest, Fetcher};
use log::debug;
use tokio_util::sync::CancellationToken;

/// Region and switch counter a fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub region: String,
    pub generation: u64,
}

pub struct DashboardSession {
    region: String,
    generation: u64,
    /// Lives as long as the session; parent of every generation token.
    lifetime: CancellationToken,
    cancel: CancellationToken,
    connected: bool,
    push: PushHandle,
    fetcher: Fetcher,
}

impl DashboardSession {
    pub fn new(region: impl Into<String>, push: PushHandle, fetcher: Fetcher) -> Self {
        let lifetime = CancellationToken::new();
        Self {
            region: region.into(),
            generation: 0,
            cancel: lifetime.child_token(),
            lifetime,
            connected: false,
            push,
            fetcher,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn scope(&self) -> Scope {
        Scope {
            region: self.region.clone(),
            generation: self.generation,
        }
    }

    pub fn is_current(&self, scope: &Scope) -> bool {
        scope.generation == self.generation && scope.region == self.region
    }

    /// Switches the active region. Returns `Ok(false)` if it was already active.
    ///
    /// In-flight fetches for the old region are cancelled. When connected the
    /// old room is left before the new one is joined.
    pub fn set_region(&mut self, region: &str) -> Result<bool, PushError> {
        if region == self.region {
            return Ok(false);
        }
        let previous = std::mem::replace(&mut self.region, region.to_string());
        self.generation += 1;
        self.cancel.cancel();
        self.cancel = self.lifetime.child_token();
        debug!(
            "Region {} -> {} (generation {})",
            previous, self.region, self.generation
        );

        if self.connected {
            self.push.send(ClientCommand::Unsubscribe { region: previous })?;
            self.push.send(ClientCommand::Subscribe {
                region: self.region.clone(),
            })?;
        }
        Ok(true)
    }

    /// Marks the channel up and joins the active region's room.
    pub fn on_connected(&mut self) -> Result<(), PushError> {
        self.connected = true;
        self.push.send(ClientCommand::Subscribe {
            region: self.region.clone(),
        })
    }

    pub fn on_disconnected(&mut self) {
        self.connected = false;
    }

    /// Issues every request in `plan` for the active scope.
    ///
    /// Counting speed and the timeline go over the push channel while it is
    /// up. Requests that do not depend on the region survive region switches.
    pub fn dispatch(&self, plan: Vec<FetchRequest>) {
        let scope = self.scope();
        for request in plan {
            if self.connected {
                if let Some(command) = self.push_command_for(&request) {
                    if self.push.send(command).is_ok() {
                        continue;
                    }
                }
            }
            let cancel = if request.is_region_scoped() {
                self.cancel.child_token()
            } else {
                self.lifetime.child_token()
            };
            self.fetcher.spawn(scope.clone(), request, cancel);
        }
    }

    /// Push equivalent of a REST request, where the server offers one.
    /// Pushed time series feed the timeline panel only.
    fn push_command_for(&self, request: &FetchRequest) -> Option<ClientCommand> {
        let region = self.region.clone();
        match request {
            FetchRequest::CountingSpeed => Some(ClientCommand::GetCountingSpeed { region }),
            FetchRequest::TimeSeries {
                kind: SeriesKind::Percentage,
                hours,
            } => Some(ClientCommand::GetTimeSeries {
                region,
                hours: *hours,
            }),
            _ => None,
        }
    }

    /// Periodic refresh: ask the server for a push when connected, otherwise
    /// poll the active view's endpoints.
    pub fn refresh_tick(&self, plan: Vec<FetchRequest>) -> Result<(), PushError> {
        if self.connected {
            let sent = self.push.send(ClientCommand::RequestUpdate {
                region: self.region.clone(),
            });
            if sent.is_ok() {
                return Ok(());
            }
            self.dispatch(plan);
            return sent;
        }
        self.dispatch(plan);
        Ok(())
    }

    /// Cancels everything still in flight.
    pub fn shutdown(&self) {
        self.lifetime.cancel();
    }

    /// Session on nationwide scope wired to in-memory queues.
    #[cfg(test)]
    pub fn for_test(
        api: crate::api::MockElectionApi,
    ) -> (
        Self,
        tokio::sync::mpsc::Receiver<ClientCommand>,
        tokio::sync::mpsc::Receiver<crate::events::DashboardMessage>,
    ) {
        let (push, commands) = PushHandle::for_test();
        let (tx, messages) = tokio::sync::mpsc::channel(16);
        let fetcher = Fetcher::new(
            std::sync::Arc::new(api),
            crate::workers::core::EventSender::new(tx),
        );
        (Self::new("CZ", push, fetcher), commands, messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockElectionApi;
    use crate::api::types::ResultsResponse;
    use crate::events::DashboardMessage;
    use crate::workers::fetcher::FetchedPayload;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct Harness {
        session: DashboardSession,
        commands: mpsc::Receiver<ClientCommand>,
        messages: mpsc::Receiver<DashboardMessage>,
    }

    fn harness(api: MockElectionApi) -> Harness {
        let (session, commands, messages) = DashboardSession::for_test(api);
        Harness {
            session,
            commands,
            messages,
        }
    }

    #[tokio::test]
    async fn test_connect_subscribes_active_region() {
        let mut h = harness(MockElectionApi::new());
        h.session.set_region("CZ020").unwrap();
        h.session.on_connected().unwrap();

        assert_eq!(
            h.commands.try_recv().unwrap(),
            ClientCommand::Subscribe {
                region: "CZ020".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_region_change_unsubscribes_before_subscribing() {
        let mut h = harness(MockElectionApi::new());
        h.session.on_connected().unwrap();
        let _ = h.commands.try_recv();

        assert!(h.session.set_region("CZ010").unwrap());
        assert_eq!(
            h.commands.try_recv().unwrap(),
            ClientCommand::Unsubscribe {
                region: "CZ".to_string()
            }
        );
        assert_eq!(
            h.commands.try_recv().unwrap(),
            ClientCommand::Subscribe {
                region: "CZ010".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_region_change_while_disconnected_sends_nothing() {
        let mut h = harness(MockElectionApi::new());
        assert!(h.session.set_region("CZ010").unwrap());
        assert!(h.commands.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_same_region_is_a_no_op() {
        let mut h = harness(MockElectionApi::new());
        let before = h.session.scope();
        assert!(!h.session.set_region("CZ").unwrap());
        assert!(h.session.is_current(&before));
    }

    #[tokio::test]
    async fn test_region_change_invalidates_old_scope() {
        let mut h = harness(MockElectionApi::new());
        let old = h.session.scope();
        let old_token = h.session.cancel.clone();

        h.session.set_region("CZ010").unwrap();
        assert!(!h.session.is_current(&old));
        assert!(old_token.is_cancelled());
        assert!(h.session.is_current(&h.session.scope()));

        // Switching back does not revive the old generation.
        h.session.set_region("CZ").unwrap();
        assert!(!h.session.is_current(&old));
    }

    #[tokio::test]
    async fn test_region_switch_keeps_region_independent_fetches() {
        let mut api = MockElectionApi::new();
        api.expect_regions().times(1).returning(|| Ok(Vec::new()));
        api.expect_current_results()
            .returning(|_| Ok(ResultsResponse::default()));
        let mut h = harness(api);

        h.session
            .dispatch(vec![FetchRequest::Regions, FetchRequest::Results]);
        h.session.set_region("CZ010").unwrap();

        let message = tokio::time::timeout(Duration::from_secs(2), h.messages.recv())
            .await
            .unwrap();
        assert!(matches!(
            message,
            Some(DashboardMessage::Fetched {
                payload: FetchedPayload::Regions(_),
                ..
            })
        ));
        // The results fetch belonged to the old region and was dropped.
        let rest = tokio::time::timeout(Duration::from_millis(50), h.messages.recv()).await;
        assert!(rest.is_err(), "unexpected message: {rest:?}");
    }

    #[tokio::test]
    async fn test_shutdown_cancels_every_fetch() {
        let mut h = harness(MockElectionApi::new());
        h.session.dispatch(vec![FetchRequest::Parties, FetchRequest::Results]);
        h.session.shutdown();

        let rest = tokio::time::timeout(Duration::from_millis(50), h.messages.recv()).await;
        assert!(rest.is_err(), "unexpected message: {rest:?}");
    }

    #[tokio::test]
    async fn test_refresh_tick_connected_requests_update() {
        let mut h = harness(MockElectionApi::new());
        h.session.on_connected().unwrap();
        let _ = h.commands.try_recv();

        h.session.refresh_tick(vec![FetchRequest::Results]).unwrap();
        assert_eq!(
            h.commands.try_recv().unwrap(),
            ClientCommand::RequestUpdate {
                region: "CZ".to_string()
            }
        );
        let polled = tokio::time::timeout(Duration::from_millis(50), h.messages.recv()).await;
        assert!(polled.is_err(), "no REST fetch expected, got {polled:?}");
    }

    #[tokio::test]
    async fn test_refresh_tick_disconnected_polls_rest() {
        let mut api = MockElectionApi::new();
        api.expect_current_results()
            .times(1)
            .returning(|_| Ok(ResultsResponse::default()));
        let mut h = harness(api);

        h.session.refresh_tick(vec![FetchRequest::Results]).unwrap();
        assert!(h.commands.try_recv().is_err());
        let message = tokio::time::timeout(Duration::from_secs(2), h.messages.recv())
            .await
            .unwrap();
        assert!(matches!(message, Some(DashboardMessage::Fetched { .. })));
    }

    #[tokio::test]
    async fn test_timeline_uses_push_when_connected() {
        let mut api = MockElectionApi::new();
        api.expect_time_series()
            .times(1)
            .returning(|_, _| Ok(Default::default()));
        let mut h = harness(api);
        h.session.on_connected().unwrap();
        let _ = h.commands.try_recv();

        h.session.dispatch(vec![
            FetchRequest::TimeSeries {
                kind: SeriesKind::Percentage,
                hours: 6,
            },
            FetchRequest::TimeSeries {
                kind: SeriesKind::TotalVotes,
                hours: 6,
            },
        ]);
        assert_eq!(
            h.commands.try_recv().unwrap(),
            ClientCommand::GetTimeSeries {
                region: "CZ".to_string(),
                hours: 6
            }
        );
        assert!(h.commands.try_recv().is_err());

        // Total votes are not pushed, so they still come over REST.
        let message = tokio::time::timeout(Duration::from_secs(2), h.messages.recv())
            .await
            .unwrap();
        assert!(matches!(
            message,
            Some(DashboardMessage::Fetched {
                payload: FetchedPayload::TimeSeries {
                    kind: SeriesKind::TotalVotes,
                    ..
                },
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_counting_speed_uses_push_when_connected() {
        let mut h = harness(MockElectionApi::new());
        h.session.on_connected().unwrap();
        let _ = h.commands.try_recv();

        h.session.dispatch(vec![FetchRequest::CountingSpeed]);
        assert_eq!(
            h.commands.try_recv().unwrap(),
            ClientCommand::GetCountingSpeed {
                region: "CZ".to_string()
            }
        );
    }
}
