//! Pure transforms from backend payloads to render-ready models.

pub mod comparison;
pub mod progress;
pub mod results;
pub mod timeseries;
pub mod trend;

pub use comparison::{ComparisonChart, aggregate};
pub use results::ResultsBoard;
pub use timeseries::{ReconciledSeries, SeriesKind, reconcile};
pub use trend::Trend;
