//! Scoped REST fetches
//!
//! Each fetch runs on its own task, tagged with the session scope it was
//! issued for and bound to that scope's cancellation token.

use super::core::EventSender;
use crate::api::ElectionApi;
use crate::api::error::ApiError;
use crate::api::types::{
    Candidate, ComparisonRow, CountingSpeed, Party, Predictions, Progress, Region,
    ResultsResponse, TimeSeriesPoint,
};
use crate::error_classifier::ErrorClassifier;
use crate::events::{DashboardMessage, EventType};
use crate::logging::LogLevel;
use crate::reconcile::SeriesKind;
use crate::session::Scope;
use log::debug;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// One backend read.
#[derive(Debug, Clone, PartialEq, strum::Display)]
pub enum FetchRequest {
    #[strum(to_string = "regions")]
    Regions,
    #[strum(to_string = "parties")]
    Parties,
    #[strum(to_string = "results")]
    Results,
    #[strum(to_string = "progress")]
    Progress,
    #[strum(to_string = "predictions")]
    Predictions,
    #[strum(to_string = "counting speed")]
    CountingSpeed,
    #[strum(to_string = "time series")]
    TimeSeries { kind: SeriesKind, hours: u32 },
    #[strum(to_string = "comparison")]
    Comparison { regions: Vec<String> },
    #[strum(to_string = "candidates")]
    Candidates { party: Option<String>, limit: u32 },
}

impl FetchRequest {
    /// Whether a region switch makes the request obsolete.
    pub fn is_region_scoped(&self) -> bool {
        !matches!(
            self,
            FetchRequest::Regions | FetchRequest::Parties | FetchRequest::Comparison { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchedPayload {
    Regions(Vec<Region>),
    Parties(Vec<Party>),
    Results(ResultsResponse),
    Progress(Progress),
    Predictions(Predictions),
    CountingSpeed(CountingSpeed),
    TimeSeries {
        kind: SeriesKind,
        points: Vec<TimeSeriesPoint>,
    },
    Comparison {
        regions: Vec<String>,
        rows: Vec<ComparisonRow>,
    },
    Candidates(Vec<Candidate>),
}

impl FetchedPayload {
    /// Whether the payload belongs to the region it was fetched for.
    pub fn is_region_scoped(&self) -> bool {
        !matches!(
            self,
            FetchedPayload::Regions(_)
                | FetchedPayload::Parties(_)
                | FetchedPayload::Comparison { .. }
        )
    }
}

#[derive(Clone)]
pub struct Fetcher {
    api: Arc<dyn ElectionApi>,
    event_sender: EventSender,
    classifier: ErrorClassifier,
}

impl Fetcher {
    pub fn new(api: Arc<dyn ElectionApi>, event_sender: EventSender) -> Self {
        Self {
            api,
            event_sender,
            classifier: ErrorClassifier::new(),
        }
    }

    pub fn api(&self) -> Arc<dyn ElectionApi> {
        Arc::clone(&self.api)
    }

    pub fn event_sender(&self) -> EventSender {
        self.event_sender.clone()
    }

    /// Runs `request` in the background and posts the result as
    /// [`DashboardMessage::Fetched`] unless `cancel` fires first.
    pub fn spawn(
        &self,
        scope: Scope,
        request: FetchRequest,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let fetcher = self.clone();
        tokio::spawn(async move {
            let region = scope.region.clone();
            let label = request.to_string();
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = fetcher.fetch(&region, request) => Some(result),
            };

            match result {
                None => debug!("Dropped {} fetch for {} (scope changed)", label, region),
                Some(Ok(payload)) => {
                    let _ = fetcher
                        .event_sender
                        .send_message(DashboardMessage::Fetched { scope, payload })
                        .await;
                }
                Some(Err(e)) => {
                    let level = fetcher.classifier.classify_fetch_error(&e);
                    fetcher
                        .event_sender
                        .send_fetch_event(
                            format!("Failed to load {} for {}: {}", label, region, e),
                            EventType::Error,
                            level,
                        )
                        .await;
                }
            }
        })
    }

    pub async fn fetch(&self, region: &str, request: FetchRequest) -> Result<FetchedPayload, ApiError> {
        let api = &self.api;
        let payload = match request {
            FetchRequest::Regions => FetchedPayload::Regions(api.regions().await?),
            FetchRequest::Parties => FetchedPayload::Parties(api.parties().await?),
            FetchRequest::Results => FetchedPayload::Results(api.current_results(region).await?),
            FetchRequest::Progress => FetchedPayload::Progress(api.progress(region).await?),
            FetchRequest::Predictions => {
                FetchedPayload::Predictions(api.predictions(region).await?)
            }
            FetchRequest::CountingSpeed => {
                FetchedPayload::CountingSpeed(api.counting_speed(region).await?)
            }
            FetchRequest::TimeSeries { kind, hours } => FetchedPayload::TimeSeries {
                kind,
                points: api.time_series(region, hours).await?.time_series,
            },
            FetchRequest::Comparison { regions } => FetchedPayload::Comparison {
                rows: api.comparison(regions.clone()).await?,
                regions,
            },
            FetchRequest::Candidates { party, limit } => {
                FetchedPayload::Candidates(api.candidates(region, party, limit).await?)
            }
        };
        Ok(payload)
    }
}
