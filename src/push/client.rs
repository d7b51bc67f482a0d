//! Websocket client for the push channel
//!
//! Keeps one connection open, reconnecting after a fixed delay, and bridges it
//! to two queues: commands in, [`PushEvent`]s out. Commands queued while the
//! socket was down are discarded on reconnect; the session re-subscribes from
//! its own state instead.

use super::error::PushError;
use super::protocol::{ClientCommand, ServerEvent};
use crate::consts::cli_consts::push;
use crate::consts::cli_consts::PUSH_COMMAND_QUEUE_SIZE;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type PushStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone)]
pub struct PushConfig {
    pub url: String,
    pub ping_interval: Duration,
    pub reconnect_delay: Duration,
}

impl PushConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ping_interval: push::ping_interval(),
            reconnect_delay: push::reconnect_delay(),
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

/// What the push task reports to its owner.
#[derive(Debug)]
pub enum PushEvent {
    Connected,
    Disconnected { reason: String },
    Server(ServerEvent),
    Failed(PushError),
}

/// Sending half of the command queue, held by the session.
#[derive(Debug, Clone)]
pub struct PushHandle {
    commands: mpsc::Sender<ClientCommand>,
}

impl PushHandle {
    /// Queues a command without waiting. Commands are written in queue order.
    pub fn send(&self, command: ClientCommand) -> Result<(), PushError> {
        self.commands
            .try_send(command)
            .map_err(|_| PushError::ChannelClosed)
    }

    #[cfg(test)]
    pub fn for_test() -> (Self, mpsc::Receiver<ClientCommand>) {
        let (commands, receiver) = mpsc::channel(PUSH_COMMAND_QUEUE_SIZE);
        (Self { commands }, receiver)
    }
}

enum ConnectionEnd {
    Shutdown,
    Lost(String),
}

/// Spawns the connection loop. It runs until `shutdown` fires.
pub fn spawn_push_client(
    config: PushConfig,
    events: mpsc::Sender<PushEvent>,
    shutdown: broadcast::Receiver<()>,
) -> (PushHandle, JoinHandle<()>) {
    let (commands_tx, commands_rx) = mpsc::channel(PUSH_COMMAND_QUEUE_SIZE);
    let handle = tokio::spawn(run_push_loop(config, commands_rx, events, shutdown));
    (PushHandle { commands: commands_tx }, handle)
}

async fn run_push_loop(
    config: PushConfig,
    mut commands: mpsc::Receiver<ClientCommand>,
    events: mpsc::Sender<PushEvent>,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!("Starting push channel for {}", config.url);

    loop {
        match connect_async(config.url.as_str()).await {
            Ok((stream, _)) => {
                info!("Push channel connected to {}", config.url);
                while commands.try_recv().is_ok() {}
                if events.send(PushEvent::Connected).await.is_err() {
                    return;
                }

                match serve(stream, &config, &mut commands, &events, &mut shutdown).await {
                    ConnectionEnd::Shutdown => return,
                    ConnectionEnd::Lost(reason) => {
                        warn!("Push channel lost: {}", reason);
                        if events
                            .send(PushEvent::Disconnected { reason })
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                }
            }
            Err(e) => {
                debug!("Push channel connect failed: {}", e);
                if events.send(PushEvent::Failed(e.into())).await.is_err() {
                    return;
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(config.reconnect_delay) => {}
            _ = shutdown.recv() => return,
        }
    }
}

async fn serve(
    stream: PushStream,
    config: &PushConfig,
    commands: &mut mpsc::Receiver<ClientCommand>,
    events: &mpsc::Sender<PushEvent>,
    shutdown: &mut broadcast::Receiver<()>,
) -> ConnectionEnd {
    let (mut write, mut read) = stream.split();
    let mut ping = tokio::time::interval(config.ping_interval);
    ping.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                let _ = write.send(Message::Close(None)).await;
                return ConnectionEnd::Shutdown;
            }
            _ = ping.tick() => {
                if let Err(e) = write.send(Message::Ping(Vec::new().into())).await {
                    return ConnectionEnd::Lost(e.to_string());
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    return ConnectionEnd::Shutdown;
                };
                match command.encode() {
                    Ok(text) => {
                        debug!("Push -> {}", text);
                        if let Err(e) = write.send(Message::Text(text.into())).await {
                            return ConnectionEnd::Lost(e.to_string());
                        }
                    }
                    Err(e) => {
                        let _ = events.send(PushEvent::Failed(e)).await;
                    }
                }
            }
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    debug!("Push <- {}", text.as_str());
                    let event = match ServerEvent::parse(text.as_str()) {
                        Ok(Some(event)) => PushEvent::Server(event),
                        Ok(None) => continue,
                        Err(e) => PushEvent::Failed(e),
                    };
                    if events.send(event).await.is_err() {
                        return ConnectionEnd::Shutdown;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    return ConnectionEnd::Lost("closed by server".to_string());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return ConnectionEnd::Lost(e.to_string()),
            },
        }
    }
}
