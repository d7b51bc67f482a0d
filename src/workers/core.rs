//! Core worker utilities

use crate::events::{DashboardMessage, Event, EventType};
use crate::logging::LogLevel;
use tokio::sync::mpsc;

/// Common sending utilities for workers feeding the dashboard loop
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<DashboardMessage>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<DashboardMessage>) -> Self {
        Self { sender }
    }

    /// Send a message; fails only once the dashboard loop has gone away.
    pub async fn send_message(&self, message: DashboardMessage) -> Result<(), ()> {
        self.sender.send(message).await.map_err(|_| ())
    }

    /// Send an activity event
    pub async fn send_event(&self, event: Event) {
        let _ = self.sender.send(DashboardMessage::Activity(event)).await;
    }

    pub async fn send_fetch_event(&self, message: String, event_type: EventType, log_level: LogLevel) {
        self.send_event(Event::fetcher(message, event_type, log_level))
            .await;
    }

    pub async fn send_push_event(&self, message: String, event_type: EventType, log_level: LogLevel) {
        self.send_event(Event::push(message, event_type, log_level))
            .await;
    }
}
