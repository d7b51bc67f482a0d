//! Results table with per-party trend arrows.

use super::trend::Trend;
use crate::api::types::PartyResult;
use std::collections::HashMap;

/// Party code → percentage seen in the previous render.
pub type LastResultsSnapshot = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub rank: usize,
    pub party_code: String,
    pub party_name: String,
    pub votes: u64,
    pub percentage: f64,
    pub mandates: u32,
    pub trend: Trend,
}

#[derive(Debug, Clone, Default)]
pub struct ResultsBoard {
    rows: Vec<ResultRow>,
    snapshot: LastResultsSnapshot,
}

impl ResultsBoard {
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn snapshot(&self) -> &LastResultsSnapshot {
        &self.snapshot
    }

    /// Replaces the rows with `results`, ranked by votes.
    ///
    /// Push updates arrive in storage order, so the ranking is redone here;
    /// equal vote counts keep their incoming order. Trends compare against the
    /// previous render only; the snapshot is then rebuilt from scratch so
    /// parties that dropped out are forgotten.
    pub fn apply(&mut self, results: &[PartyResult]) {
        let mut ranked: Vec<&PartyResult> = results.iter().collect();
        ranked.sort_by(|a, b| b.votes.cmp(&a.votes));

        self.rows = ranked
            .into_iter()
            .enumerate()
            .map(|(index, result)| ResultRow {
                rank: index + 1,
                party_code: result.party_code.clone(),
                party_name: result.party_name.clone(),
                votes: result.votes,
                percentage: result.percentage,
                mandates: result.mandates,
                trend: Trend::classify(
                    self.snapshot.get(&result.party_code).copied(),
                    result.percentage,
                ),
            })
            .collect();

        self.snapshot = results
            .iter()
            .map(|r| (r.party_code.clone(), r.percentage))
            .collect();
    }

    /// Party with the most votes, if any results are shown.
    pub fn leader(&self) -> Option<&ResultRow> {
        self.rows.iter().max_by_key(|row| row.votes)
    }

    pub fn total_votes(&self) -> u64 {
        self.rows.iter().map(|row| row.votes).sum()
    }
}
