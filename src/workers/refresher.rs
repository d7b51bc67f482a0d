//! Refresh timer

use super::core::EventSender;
use crate::events::DashboardMessage;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Posts [`DashboardMessage::RefreshTick`] every `interval` until shutdown.
/// The first tick comes one full interval after start.
pub fn start_refresher(
    interval: Duration,
    event_sender: EventSender,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = ticker.tick() => {
                    if event_sender.send_message(DashboardMessage::RefreshTick).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}
