use crate::api::error::ApiError;
use crate::api::types::{
    Candidate, ComparisonRow, CountingSpeed, ExportFormat, Party, Predictions, Progress, Region,
    ResultsResponse, TimeSeriesResponse,
};

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub mod types;

#[cfg(test)]
use mockall::{automock, predicate::*};

/// Read-only view of the results backend.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ElectionApi: Send + Sync {
    /// All regions and districts, nationwide scope excluded.
    async fn regions(&self) -> Result<Vec<Region>, ApiError>;

    /// Parties on the ballot, in ballot order.
    async fn parties(&self) -> Result<Vec<Party>, ApiError>;

    /// Latest per-party results for a region, ranked by votes.
    async fn current_results(&self, region: &str) -> Result<ResultsResponse, ApiError>;

    /// Counting progress for a region.
    async fn progress(&self, region: &str) -> Result<Progress, ApiError>;

    /// Projected final results for a region.
    async fn predictions(&self, region: &str) -> Result<Predictions, ApiError>;

    /// Districts counted per hour over the last hour.
    async fn counting_speed(&self, region: &str) -> Result<CountingSpeed, ApiError>;

    /// Per-minute aggregates over the last `hours` hours.
    async fn time_series(&self, region: &str, hours: u32)
    -> Result<TimeSeriesResponse, ApiError>;

    /// Latest results for each of `regions`; unknown codes are skipped by the backend.
    async fn comparison(&self, regions: Vec<String>) -> Result<Vec<ComparisonRow>, ApiError>;

    /// Candidates ranked by preferential votes.
    async fn candidates(
        &self,
        region: &str,
        party: Option<String>,
        limit: u32,
    ) -> Result<Vec<Candidate>, ApiError>;

    /// Raw export file for a region.
    async fn export(&self, region: &str, format: ExportFormat) -> Result<Vec<u8>, ApiError>;
}
