//! Push channel wire protocol
//!
//! Every frame is a JSON text message `{"event": <name>, "data": {...}}`.

use super::error::PushError;
use crate::api::types::{CountingSpeed, PartyResult, Progress, RegionRef, TimeSeriesPoint};
use serde::{Deserialize, Serialize};

/// Commands the dashboard sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, strum::IntoStaticStr)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClientCommand {
    Subscribe { region: String },
    Unsubscribe { region: String },
    RequestUpdate { region: String },
    GetCountingSpeed { region: String },
    GetTimeSeries { region: String, hours: u32 },
}

impl ClientCommand {
    pub fn encode(&self) -> Result<String, PushError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn region(&self) -> &str {
        match self {
            ClientCommand::Subscribe { region }
            | ClientCommand::Unsubscribe { region }
            | ClientCommand::RequestUpdate { region }
            | ClientCommand::GetCountingSpeed { region }
            | ClientCommand::GetTimeSeries { region, .. } => region,
        }
    }
}

/// Partial snapshot pushed for a subscribed region. Absent parts are left alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdatePayload {
    pub region: Option<RegionRef>,
    pub results: Option<Vec<PartyResult>>,
    pub progress: Option<Progress>,
    pub timestamp: Option<String>,
}

impl UpdatePayload {
    pub fn region_code(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.code.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeSeriesPush {
    pub region: Option<String>,
    #[serde(alias = "data")]
    pub time_series: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CountingSpeedPush {
    pub region: Option<String>,
    #[serde(flatten)]
    pub speed: CountingSpeed,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Ack {
    region: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Events the server pushes to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Connected { message: String },
    Subscribed { region: String },
    Unsubscribed { region: String },
    Update(UpdatePayload),
    TimeSeriesData(TimeSeriesPush),
    CountingSpeedData(CountingSpeedPush),
    Error { message: String },
}

impl ServerEvent {
    /// Parses one text frame. Unknown event names yield `Ok(None)`.
    pub fn parse(text: &str) -> Result<Option<Self>, PushError> {
        let envelope: Envelope =
            serde_json::from_str(text).map_err(|e| PushError::Protocol(e.to_string()))?;
        let data = match envelope.data {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            data => data,
        };

        let event = match envelope.event.as_str() {
            "connected" => ServerEvent::Connected {
                message: decode::<Ack>(data)?.message,
            },
            "subscribed" => ServerEvent::Subscribed {
                region: decode::<Ack>(data)?.region,
            },
            "unsubscribed" => ServerEvent::Unsubscribed {
                region: decode::<Ack>(data)?.region,
            },
            "update" => ServerEvent::Update(decode(data)?),
            "time_series_data" => ServerEvent::TimeSeriesData(decode(data)?),
            "counting_speed_data" => ServerEvent::CountingSpeedData(decode(data)?),
            "error" => ServerEvent::Error {
                message: decode::<Ack>(data)?.message,
            },
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

fn decode<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> Result<T, PushError> {
    serde_json::from_value(data).map_err(|e| PushError::Protocol(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_envelope() {
        let cmd = ClientCommand::Subscribe {
            region: "CZ010".to_string(),
        };
        assert_eq!(
            cmd.encode().unwrap(),
            r#"{"event":"subscribe","data":{"region":"CZ010"}}"#
        );

        let cmd = ClientCommand::GetTimeSeries {
            region: "CZ".to_string(),
            hours: 6,
        };
        assert_eq!(
            cmd.encode().unwrap(),
            r#"{"event":"get_time_series","data":{"region":"CZ","hours":6}}"#
        );
        assert_eq!(cmd.name(), "get_time_series");
        assert_eq!(cmd.region(), "CZ");
    }

    #[test]
    fn test_partial_update() {
        let event = ServerEvent::parse(
            r#"{"event": "update", "data": {
                "region": {"code": "CZ", "name": "Česko"},
                "progress": {"counted_districts": 10, "total_districts": 100, "percentage_counted": 10.0}
            }}"#,
        )
        .unwrap()
        .unwrap();

        match event {
            ServerEvent::Update(update) => {
                assert_eq!(update.region_code(), Some("CZ"));
                assert!(update.results.is_none());
                assert_eq!(update.progress.unwrap().counted_districts, 10);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_acks_and_missing_data() {
        assert_eq!(
            ServerEvent::parse(r#"{"event": "subscribed", "data": {"region": "CZ", "room": "region_CZ"}}"#)
                .unwrap(),
            Some(ServerEvent::Subscribed {
                region: "CZ".to_string()
            })
        );
        assert_eq!(
            ServerEvent::parse(r#"{"event": "connected"}"#).unwrap(),
            Some(ServerEvent::Connected {
                message: String::new()
            })
        );
    }

    #[test]
    fn test_time_series_accepts_data_key() {
        let event = ServerEvent::parse(
            r#"{"event": "time_series_data", "data": {"region": "CZ",
                "data": [{"timestamp": "2025-10-04T14:00:00", "new_votes": 5}]}}"#,
        )
        .unwrap();
        match event {
            Some(ServerEvent::TimeSeriesData(push)) => {
                assert_eq!(push.region.as_deref(), Some("CZ"));
                assert_eq!(push.time_series.len(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_counting_speed_is_flattened() {
        let event = ServerEvent::parse(
            r#"{"event": "counting_speed_data", "data": {"region": "CZ",
                "districts_per_hour": 240.5, "estimated_hours_to_complete": 1.5}}"#,
        )
        .unwrap();
        match event {
            Some(ServerEvent::CountingSpeedData(push)) => {
                assert_eq!(push.speed.districts_per_hour, 240.5);
                assert_eq!(push.speed.estimated_hours, 1.5);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_and_malformed() {
        assert_eq!(ServerEvent::parse(r#"{"event": "pong", "data": {}}"#).unwrap(), None);
        assert!(matches!(
            ServerEvent::parse("not json"),
            Err(PushError::Protocol(_))
        ));
    }
}
