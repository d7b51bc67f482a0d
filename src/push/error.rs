//! Push channel errors

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum PushError {
    /// The websocket handshake or transport failed.
    #[error("Connection error: {0}")]
    Connect(#[from] tungstenite::Error),

    /// The server sent a frame we could not understand.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A command could not be serialized.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The push task is gone or its command queue is full.
    #[error("Push channel closed")]
    ChannelClosed,
}
