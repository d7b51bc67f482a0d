//! Event System
//!
//! Activity events produced by the background workers and the message type
//! that carries everything into the dashboard loop.

use crate::logging::{LogLevel, should_log_with_env};
use crate::push::PushEvent;
use crate::session::Scope;
use crate::workers::fetcher::FetchedPayload;
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Source {
    /// REST fetches for the active view.
    Fetcher,
    /// Websocket connection manager.
    #[strum(to_string = "Push")]
    PushChannel,
    /// Periodic refresh timer.
    Refresher,
    /// View and region switching.
    Router,
    /// File exports.
    Export,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Connection,
    StateChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    pub fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn fetcher(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Fetcher, msg, event_type, log_level)
    }

    pub fn push(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::PushChannel, msg, event_type, log_level)
    }

    pub fn router(msg: String) -> Self {
        Self::new(Source::Router, msg, EventType::StateChange, LogLevel::Debug)
    }

    pub fn should_display(&self) -> bool {
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }

    /// Forwards the event to the `log` facade at its own level.
    pub fn log(&self) {
        let level: log::Level = self.log_level.into();
        log::log!(level, "[{}] {}", self.source, self.msg);
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.source, self.msg
        )
    }
}

/// Everything that can change what the dashboard shows.
#[derive(Debug)]
pub enum DashboardMessage {
    Activity(Event),
    Fetched {
        scope: Scope,
        payload: FetchedPayload,
    },
    Push(PushEvent),
    RefreshTick,
}
