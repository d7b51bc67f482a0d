//! Wire types of the results backend.
//!
//! The backend omits fields freely while counting is in progress, so nearly
//! everything carries `#[serde(default)]` and is treated as zero/empty when
//! missing or `null` rather than as a decode error.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of administrative region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RegionKind {
    /// Region (kraj)
    Kraj,
    /// District (okres)
    Okres,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Region {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: RegionKind,
    pub parent_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegionsResponse {
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Party {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub short_name: Option<String>,
    pub number: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartiesResponse {
    pub parties: Vec<Party>,
}

/// Code and name of the region a payload belongs to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegionRef {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PartyResult {
    #[serde(deserialize_with = "null_as_default")]
    pub party_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub party_name: String,
    pub party_number: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub votes: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub percentage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub mandates: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResultsResponse {
    pub region: Option<RegionRef>,
    /// `None` when the backend sent no results at all; the table is left as is.
    pub results: Option<Vec<PartyResult>>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Progress {
    #[serde(deserialize_with = "null_as_default")]
    pub counted_districts: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_districts: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub percentage_counted: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub turnout: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub valid_votes: u64,
    pub total_voters: Option<u64>,
    pub total_votes: Option<u64>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PredictedParty {
    #[serde(deserialize_with = "null_as_default")]
    pub party_name: String,
    pub current_votes: Option<u64>,
    pub current_percentage: Option<f64>,
    pub predicted_votes: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub predicted_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Predictions {
    #[serde(deserialize_with = "null_as_default")]
    pub current_counted_percentage: f64,
    pub parties: Option<Vec<PredictedParty>>,
}

/// One party's figures at one instant of the time series.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PartyPoint {
    pub name: Option<String>,
    pub votes: Option<u64>,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeSeriesPoint {
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub counted_districts: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_districts: u32,
    pub total_votes: Option<u64>,
    /// Votes counted during this interval, as reported by the backend.
    pub new_votes: Option<u64>,
    /// Keyed by party code, in the order the backend listed them.
    pub parties: IndexMap<String, PartyPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeSeriesResponse {
    pub region: Option<RegionRef>,
    pub time_series: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComparisonRow {
    #[serde(deserialize_with = "null_as_default")]
    pub region_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region_name: String,
    pub results: Vec<PartyResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComparisonResponse {
    pub comparison: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Candidate {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub surname: String,
    pub title_before: Option<String>,
    pub title_after: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub party_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub position: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub preferential_votes: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub preferential_percentage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub elected: bool,
}

impl Candidate {
    /// Name with academic titles, e.g. "Ing. Jan Novák Ph.D.".
    pub fn full_name(&self) -> String {
        [
            self.title_before.as_deref().unwrap_or(""),
            self.name.as_str(),
            self.surname.as_str(),
            self.title_after.as_deref().unwrap_or(""),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CandidatesResponse {
    pub candidates: Vec<Candidate>,
}

/// Counting speed, delivered over the push channel or `/api/counting_speed`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CountingSpeed {
    #[serde(deserialize_with = "null_as_default")]
    pub districts_per_hour: f64,
    #[serde(alias = "estimated_hours_to_complete")]
    #[serde(deserialize_with = "null_as_default")]
    pub estimated_hours: f64,
    pub districts_last_hour: Option<i64>,
    pub remaining_districts: Option<i64>,
    pub current_percentage: Option<f64>,
}

/// File formats offered by `/api/export/{format}`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_kind_accepts_unknown_types() {
        let regions: RegionsResponse = serde_json::from_str(
            r#"{"regions": [
                {"code": "CZ010", "name": "Praha", "type": "kraj"},
                {"code": "CZ0100", "name": "Praha", "type": "okres", "parent_code": "CZ010"},
                {"code": "999", "name": "Zahraničí", "type": "zahranici"}
            ]}"#,
        )
        .unwrap();
        let kinds: Vec<_> = regions.regions.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RegionKind::Kraj, RegionKind::Okres, RegionKind::Other]
        );
        assert_eq!(regions.regions[1].parent_code.as_deref(), Some("CZ010"));
    }

    #[test]
    fn test_missing_fields_default() {
        let progress: Progress = serde_json::from_str(r#"{"counted_districts": 12}"#).unwrap();
        assert_eq!(progress.counted_districts, 12);
        assert_eq!(progress.total_districts, 0);
        assert_eq!(progress.turnout, 0.0);

        let results: ResultsResponse = serde_json::from_str("{}").unwrap();
        assert!(results.results.is_none());
    }

    #[test]
    fn test_null_fields_default() {
        let response: CandidatesResponse = serde_json::from_str(
            r#"{"candidates": [{"name": "Jan", "surname": "Novák", "party_name": null,
                "region_name": "Praha", "position": null, "preferential_votes": 1200,
                "preferential_percentage": null, "elected": null}]}"#,
        )
        .unwrap();
        let candidate = &response.candidates[0];
        assert_eq!(candidate.position, 0);
        assert_eq!(candidate.party_name, "");
        assert_eq!(candidate.preferential_votes, 1200);
        assert_eq!(candidate.preferential_percentage, 0.0);
        assert!(!candidate.elected);

        let progress: Progress =
            serde_json::from_str(r#"{"counted_districts": null, "turnout": 61.2}"#).unwrap();
        assert_eq!(progress.counted_districts, 0);
        assert_eq!(progress.turnout, 61.2);

        let region: Region =
            serde_json::from_str(r#"{"code": "CZ010", "type": null}"#).unwrap();
        assert_eq!(region.kind, RegionKind::Other);
    }

    #[test]
    fn test_time_series_keeps_party_order() {
        let point: TimeSeriesPoint = serde_json::from_str(
            r#"{"timestamp": "2025-10-04T14:05:00",
                "parties": {"ZZ": {"votes": 1}, "AA": {"votes": 2}, "MM": {"votes": 3}}}"#,
        )
        .unwrap();
        let codes: Vec<_> = point.parties.keys().cloned().collect();
        assert_eq!(codes, vec!["ZZ", "AA", "MM"]);
        assert_eq!(point.new_votes, None);
    }

    #[test]
    fn test_candidate_full_name() {
        let candidate = Candidate {
            name: "Jan".into(),
            surname: "Novák".into(),
            title_before: Some("Ing.".into()),
            ..Default::default()
        };
        assert_eq!(candidate.full_name(), "Ing. Jan Novák");
    }

    #[test]
    fn test_counting_speed_accepts_rest_field_name() {
        let speed: CountingSpeed = serde_json::from_str(
            r#"{"districts_per_hour": 120.5, "estimated_hours_to_complete": 1.5}"#,
        )
        .unwrap();
        assert_eq!(speed.estimated_hours, 1.5);
    }

    #[test]
    fn test_export_format_names() {
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    }
}
