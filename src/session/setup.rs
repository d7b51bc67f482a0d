//! Session setup and initialization

use super::client_session::DashboardSession;
use crate::api::{ApiClient, ElectionApi};
use crate::consts::cli_consts::MESSAGE_QUEUE_SIZE;
use crate::environment::Environment;
use crate::events::DashboardMessage;
use crate::push::PushConfig;
use crate::workers::connection::start_connection_manager;
use crate::workers::core::EventSender;
use crate::workers::fetcher::Fetcher;
use crate::workers::refresher::start_refresher;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Everything the workers produce, in arrival order
    pub message_receiver: mpsc::Receiver<DashboardMessage>,
    /// Join handles for worker tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop all workers
    pub shutdown_sender: broadcast::Sender<()>,
    /// Active region, push subscriptions and fetch scope
    pub session: DashboardSession,
    /// Backend the session talks to
    pub environment: Environment,
}

/// Sets up a dashboard session
///
/// 1. Creates the REST client and the shared message channel
/// 2. Starts the push channel with its connection manager
/// 3. Starts the refresh timer
///
/// No request is issued yet; the caller enters the first view.
pub async fn setup_session(
    env: Environment,
    region: String,
    refresh_interval: Duration,
) -> Result<SessionData, Box<dyn Error>> {
    let api: Arc<dyn ElectionApi> = Arc::new(ApiClient::new(env.clone())?);

    let (message_sender, message_receiver) = mpsc::channel(MESSAGE_QUEUE_SIZE);
    let event_sender = EventSender::new(message_sender);

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);

    let (push, mut join_handles) = start_connection_manager(
        PushConfig::new(env.push_url()),
        event_sender.clone(),
        shutdown_sender.subscribe(),
    );
    join_handles.push(start_refresher(
        refresh_interval,
        event_sender.clone(),
        shutdown_sender.subscribe(),
    ));

    let fetcher = Fetcher::new(api, event_sender);
    let session = DashboardSession::new(region, push, fetcher);

    Ok(SessionData {
        message_receiver,
        join_handles,
        shutdown_sender,
        session,
        environment: env,
    })
}
