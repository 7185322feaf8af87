//! Client error types.

use std::path::PathBuf;
use tanglefeed_core::FrameError;
use tokio_tungstenite::tungstenite;

/// Errors surfaced by the connection and its configuration.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("failed to read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Whether the connection is unusable after this error.
    ///
    /// A malformed frame only costs that frame.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ClientError::Frame(_))
    }
}

/// A handler could not make sense of its payload.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("payload decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}
