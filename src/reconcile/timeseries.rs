//! Time-series reconciliation
//!
//! Turns the backend's per-minute snapshots into one aligned slot vector per
//! party. Parties that enter mid-count get gaps (`None`) before their first
//! appearance rather than being dropped or zero-filled.

use crate::api::types::TimeSeriesPoint;
use chrono::{DateTime, NaiveDateTime};
use indexmap::IndexMap;

/// Which quantity the party lines carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeriesKind {
    /// Vote share in percent; volume is the backend's `new_votes`.
    Percentage,
    /// Absolute votes; volume is the growth of the summed party votes.
    TotalVotes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartySeries {
    pub code: String,
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl PartySeries {
    /// Value in the final slot, with a gap counted as zero.
    pub fn last_value(&self) -> f64 {
        self.values.last().copied().flatten().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leader {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesSummary {
    pub current_total: u64,
    pub mean_new_votes: f64,
    pub peak_new_votes: u64,
    pub leading: Option<Leader>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledSeries {
    pub kind: SeriesKind,
    pub labels: Vec<String>,
    /// Ranked by final-slot value, highest first.
    pub series: Vec<PartySeries>,
    pub volume: Vec<u64>,
    pub summary: SeriesSummary,
}

impl ReconciledSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Orders points by time when every timestamp parses; otherwise keeps input order.
fn ordered(points: &[TimeSeriesPoint]) -> Vec<(&TimeSeriesPoint, Option<NaiveDateTime>)> {
    let mut keyed: Vec<_> = points
        .iter()
        .map(|p| (p, parse_timestamp(&p.timestamp)))
        .collect();
    if keyed.iter().all(|(_, ts)| ts.is_some()) {
        keyed.sort_by_key(|(_, ts)| *ts);
    }
    keyed
}

fn party_votes_total(point: &TimeSeriesPoint) -> u64 {
    point.parties.values().filter_map(|p| p.votes).sum()
}

/// Reconciles `points` into aligned series.
///
/// Returns `None` for an empty input so callers keep whatever they showed
/// before.
pub fn reconcile(points: &[TimeSeriesPoint], kind: SeriesKind) -> Option<ReconciledSeries> {
    if points.is_empty() {
        return None;
    }

    let points = ordered(points);
    let slots = points.len();

    let labels: Vec<String> = points
        .iter()
        .map(|(p, ts)| match ts {
            Some(ts) => ts.format("%H:%M").to_string(),
            None => p.timestamp.clone(),
        })
        .collect();

    // Party universe in first-seen order; the label is taken at discovery.
    let mut universe: IndexMap<&str, String> = IndexMap::new();
    for (point, _) in &points {
        for (code, party) in &point.parties {
            universe.entry(code.as_str()).or_insert_with(|| {
                party
                    .name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| code.clone())
            });
        }
    }

    let mut series: Vec<PartySeries> = universe
        .iter()
        .map(|(code, label)| PartySeries {
            code: code.to_string(),
            label: label.clone(),
            values: points
                .iter()
                .map(|(point, _)| {
                    point.parties.get(*code).map(|party| match kind {
                        SeriesKind::Percentage => party.percentage.unwrap_or(0.0),
                        SeriesKind::TotalVotes => party.votes.unwrap_or(0) as f64,
                    })
                })
                .collect(),
        })
        .collect();

    // Stable, so ties keep discovery order.
    series.sort_by(|a, b| b.last_value().total_cmp(&a.last_value()));

    let totals: Vec<u64> = points.iter().map(|(p, _)| party_votes_total(p)).collect();
    let volume: Vec<u64> = match kind {
        SeriesKind::Percentage => points
            .iter()
            .map(|(p, _)| p.new_votes.unwrap_or(0))
            .collect(),
        SeriesKind::TotalVotes => (0..slots)
            .map(|i| {
                if i == 0 {
                    0
                } else {
                    totals[i].saturating_sub(totals[i - 1])
                }
            })
            .collect(),
    };

    let current_total = match kind {
        SeriesKind::Percentage => points
            .last()
            .map(|(p, _)| p.total_votes.unwrap_or_else(|| party_votes_total(p)))
            .unwrap_or_default(),
        SeriesKind::TotalVotes => totals.last().copied().unwrap_or_default(),
    };

    let summary = SeriesSummary {
        current_total,
        mean_new_votes: volume.iter().sum::<u64>() as f64 / slots as f64,
        peak_new_votes: volume.iter().copied().max().unwrap_or_default(),
        leading: series.first().map(|s| Leader {
            label: s.label.clone(),
            value: s.last_value(),
        }),
    };

    Some(ReconciledSeries {
        kind,
        labels,
        series,
        volume,
        summary,
    })
}
