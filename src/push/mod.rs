//! Push channel: server-initiated updates over a websocket.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{PushConfig, PushEvent, PushHandle, spawn_push_client};
pub use error::PushError;
pub use protocol::{ClientCommand, ServerEvent};
