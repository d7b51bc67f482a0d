//! Cross-region comparison aggregator.

use crate::api::types::ComparisonRow;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionBars {
    pub region_code: String,
    pub region_name: String,
    /// One value per entry of [`ComparisonChart::parties`], zero where absent.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonChart {
    pub parties: Vec<String>,
    pub regions: Vec<RegionBars>,
}

impl ComparisonChart {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Largest share across all regions, used to scale the bars.
    pub fn max_value(&self) -> f64 {
        self.regions
            .iter()
            .flat_map(|r| r.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// Builds a dense region × party grid keyed by party name.
///
/// Party order is first appearance across the rows in response order.
pub fn aggregate(rows: &[ComparisonRow]) -> ComparisonChart {
    let mut parties: Vec<String> = Vec::new();
    for row in rows {
        for result in &row.results {
            if !parties.contains(&result.party_name) {
                parties.push(result.party_name.clone());
            }
        }
    }

    let regions = rows
        .iter()
        .map(|row| RegionBars {
            region_code: row.region_code.clone(),
            region_name: row.region_name.clone(),
            values: parties
                .iter()
                .map(|party| {
                    row.results
                        .iter()
                        .find(|r| &r.party_name == party)
                        .map(|r| r.percentage)
                        .unwrap_or(0.0)
                })
                .collect(),
        })
        .collect();

    ComparisonChart { parties, regions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::PartyResult;

    fn row(code: &str, results: &[(&str, f64)]) -> ComparisonRow {
        ComparisonRow {
            region_code: code.to_string(),
            region_name: format!("Region {code}"),
            results: results
                .iter()
                .map(|(name, pct)| PartyResult {
                    party_name: name.to_string(),
                    percentage: *pct,
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_union_in_first_seen_order() {
        let chart = aggregate(&[
            row("CZ", &[("ANO", 35.0), ("SPOLU", 25.0)]),
            row("CZ010", &[("SPOLU", 30.0), ("STAN", 12.0)]),
        ]);

        assert_eq!(chart.parties, vec!["ANO", "SPOLU", "STAN"]);
        assert_eq!(chart.regions[0].values, vec![35.0, 25.0, 0.0]);
        assert_eq!(chart.regions[1].values, vec![0.0, 30.0, 12.0]);
        assert_eq!(chart.max_value(), 35.0);
    }

    #[test]
    fn test_every_region_is_dense() {
        let chart = aggregate(&[
            row("CZ", &[("A", 1.0)]),
            row("CZ020", &[]),
            row("CZ080", &[("B", 2.0), ("C", 3.0)]),
        ]);
        for region in &chart.regions {
            assert_eq!(region.values.len(), chart.parties.len());
        }
        assert_eq!(chart.regions[1].values, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_rows() {
        let chart = aggregate(&[]);
        assert!(chart.is_empty());
        assert!(chart.parties.is_empty());
        assert_eq!(chart.max_value(), 0.0);
    }
}
