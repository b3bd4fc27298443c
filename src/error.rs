//! Error types for the feed registry

use thiserror::Error;

/// Feed registry and connection errors
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("exchange id {exchange} not registered as a factory")]
    NotRegistered { exchange: String },

    #[error("exchange id {exchange} registered twice")]
    DuplicateRegistration { exchange: String },

    #[error("Failed to load symbol configuration for {exchange}: {reason}")]
    ConfigLoad { exchange: String, reason: String },

    #[error("No websocket endpoint defined for {exchange}")]
    NoEndpoint { exchange: String },

    #[error("Failed to send message: {0}")]
    Send(String),

    #[error("Connection closed: {0}")]
    Closed(String),

    #[error("WebSocket connection error: {0}")]
    WebSocketConnection(String),

    #[error("WebSocket message error: {0}")]
    WebSocketMessage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Connection timeout")]
    ConnectionTimeout,
}

impl FeedError {
    pub(crate) fn config_load(exchange: &str, reason: impl ToString) -> Self {
        FeedError::ConfigLoad {
            exchange: exchange.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for FeedError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        FeedError::WebSocketConnection(err.to_string())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
