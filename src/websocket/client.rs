//! WebSocket client for exchange feeds
//!
//! Handles the raw socket: dial, send, receive, keepalive, close.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{
    connect_async,
    tungstenite::protocol::Message,
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info, warn};

use crate::error::{FeedError, Result};
use crate::protocol::MessageSink;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client for a single connection
pub struct WebSocketClient {
    stream: Option<WsStream>,
}

impl WebSocketClient {
    /// Create a new, unconnected client
    pub fn new() -> Self {
        Self { stream: None }
    }

    /// Connect to the WebSocket endpoint
    pub async fn connect(&mut self, url: &str, connect_timeout: Duration) -> Result<()> {
        info!(url = %url, "Connecting to exchange WebSocket");

        let (ws_stream, response) = timeout(connect_timeout, connect_async(url))
            .await
            .map_err(|_| FeedError::ConnectionTimeout)?
            .map_err(|e| FeedError::WebSocketConnection(format!("Failed to connect: {}", e)))?;

        info!(status = ?response.status(), "WebSocket connected");
        self.stream = Some(ws_stream);

        Ok(())
    }

    /// Send a text frame
    pub async fn send_text(&mut self, text: String) -> Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| FeedError::Send("Not connected".to_string()))?;

        stream
            .send(Message::Text(text))
            .await
            .map_err(|e| FeedError::Send(e.to_string()))
    }

    /// Receive the next text payload; `None` for control frames
    pub async fn recv(&mut self) -> Result<Option<String>> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| FeedError::Closed("Not connected".to_string()))?;

        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                debug!(len = text.len(), "Received text message");
                Ok(Some(text))
            }
            Some(Ok(Message::Binary(data))) => {
                let text = String::from_utf8_lossy(&data).to_string();
                Ok(Some(text))
            }
            Some(Ok(Message::Ping(data))) => {
                debug!("Received ping, sending pong");
                if let Some(stream) = self.stream.as_mut() {
                    let _ = stream.send(Message::Pong(data)).await;
                }
                Ok(None)
            }
            Some(Ok(Message::Pong(_))) => {
                debug!("Received pong");
                Ok(None)
            }
            Some(Ok(Message::Close(frame))) => {
                warn!(frame = ?frame, "Received close frame");
                self.stream = None;
                Err(FeedError::Closed("Connection closed by peer".to_string()))
            }
            Some(Ok(Message::Frame(_))) => Ok(None),
            Some(Err(e)) => {
                error!(error = %e, "WebSocket error");
                self.stream = None;
                Err(FeedError::Closed(e.to_string()))
            }
            None => {
                warn!("WebSocket stream ended");
                self.stream = None;
                Err(FeedError::Closed("Stream ended".to_string()))
            }
        }
    }

    /// Send a ping to keep connection alive. A failed ping means the
    /// connection is stale.
    pub async fn ping(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.as_mut() {
            if let Err(e) = stream.send(Message::Ping(vec![])).await {
                warn!(error = %e, "Failed to send keepalive ping");
                return Err(FeedError::ConnectionTimeout);
            }
        }
        Ok(())
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Close the connection
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.close(None).await;
        }
    }
}

impl Default for WebSocketClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSink for WebSocketClient {
    async fn send_json(&mut self, message: &Value) -> Result<()> {
        debug!(message = %message, "Sending JSON message");
        self.send_text(serde_json::to_string(message)?).await
    }
}
