//! Connection Manager
//!
//! Owns the push channel task and relays what it reports into the dashboard
//! loop, turning connection changes and failures into activity events.

use super::core::EventSender;
use crate::error_classifier::ErrorClassifier;
use crate::events::{DashboardMessage, EventType};
use crate::logging::LogLevel;
use crate::push::{PushConfig, PushEvent, PushHandle, ServerEvent, spawn_push_client};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Starts the push channel and its relay. Returns the command handle the
/// session uses to (un)subscribe.
pub fn start_connection_manager(
    config: PushConfig,
    event_sender: EventSender,
    shutdown: broadcast::Receiver<()>,
) -> (PushHandle, Vec<JoinHandle<()>>) {
    let (push_tx, push_rx) = mpsc::channel(64);
    let (handle, push_task) = spawn_push_client(config, push_tx, shutdown);
    let relay = tokio::spawn(relay_push_events(push_rx, event_sender));
    (handle, vec![push_task, relay])
}

async fn relay_push_events(mut push_rx: mpsc::Receiver<PushEvent>, event_sender: EventSender) {
    let classifier = ErrorClassifier::new();
    // Connect failures repeat every reconnect; only the first of a streak is shown.
    let mut failing = false;

    while let Some(event) = push_rx.recv().await {
        match &event {
            PushEvent::Connected => {
                failing = false;
                event_sender
                    .send_push_event(
                        "Push channel connected".to_string(),
                        EventType::Connection,
                        LogLevel::Info,
                    )
                    .await;
            }
            PushEvent::Disconnected { reason } => {
                event_sender
                    .send_push_event(
                        format!("Push channel disconnected ({}), polling every refresh", reason),
                        EventType::Connection,
                        LogLevel::Warn,
                    )
                    .await;
            }
            PushEvent::Failed(e) => {
                let level = if failing {
                    LogLevel::Trace
                } else {
                    classifier.classify_push_error(e)
                };
                failing = true;
                event_sender
                    .send_push_event(format!("Push channel: {}", e), EventType::Error, level)
                    .await;
                continue;
            }
            PushEvent::Server(ServerEvent::Error { message }) => {
                event_sender
                    .send_push_event(
                        format!("Server error: {}", message),
                        EventType::Error,
                        LogLevel::Warn,
                    )
                    .await;
                continue;
            }
            PushEvent::Server(_) => {}
        }

        if event_sender
            .send_message(DashboardMessage::Push(event))
            .await
            .is_err()
        {
            break;
        }
    }
}
