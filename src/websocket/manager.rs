//! WebSocket connection manager
//!
//! A manager is the handle the registry hands out: one endpoint, one optional
//! subscription protocol, one socket. Subscriptions are sent right after the
//! socket opens and withdrawn right before it closes.

use std::time::{Duration, Instant};
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::WebSocketClient;
use crate::error::{FeedError, Result};
use crate::protocol::{MessageSink, SubscriptionProtocol};

/// Default handshake timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default quiet period before a keepalive ping
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(45);

/// Manages a single exchange WebSocket connection
pub struct WebSocketManager {
    exchange: String,
    endpoint: Option<String>,
    protocol: Option<SubscriptionProtocol>,
    client: WebSocketClient,
    connect_timeout: Duration,
    recv_timeout: Duration,
}

impl WebSocketManager {
    /// Create a new WebSocket manager. Nothing is dialled until `connect`.
    pub fn new(
        exchange: impl Into<String>,
        endpoint: Option<String>,
        protocol: Option<SubscriptionProtocol>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            endpoint,
            protocol,
            client: WebSocketClient::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            recv_timeout: DEFAULT_RECV_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, recv_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.recv_timeout = recv_timeout;
        self
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Endpoint URL, `None` for exchanges without a feed integration
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn protocol(&self) -> Option<&SubscriptionProtocol> {
        self.protocol.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// Open the socket and send the subscribe sequence
    pub async fn connect(&mut self) -> Result<()> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| FeedError::NoEndpoint {
            exchange: self.exchange.clone(),
        })?;

        self.client.connect(endpoint, self.connect_timeout).await?;

        if let Some(protocol) = &self.protocol {
            protocol.subscribe(&mut self.client).await?;
            info!(
                exchange = %self.exchange,
                symbols = ?protocol.symbols().as_slice(),
                "Subscribed to order book and trade channels"
            );
        }

        Ok(())
    }

    /// Send the unsubscribe sequence and close the socket
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.client.is_connected() {
            return Ok(());
        }

        let result = match &self.protocol {
            Some(protocol) => protocol.unsubscribe(&mut self.client).await,
            None => Ok(()),
        };
        if let Err(e) = &result {
            warn!(exchange = %self.exchange, error = %e, "Failed to unsubscribe");
        }

        self.client.close().await;
        info!(exchange = %self.exchange, "WebSocket disconnected");

        result
    }

    /// Receive the next inbound message as JSON
    ///
    /// Control frames are handled internally. A text frame that is not JSON
    /// is returned as a JSON string.
    pub async fn receive(&mut self) -> Result<Value> {
        if !self.client.is_connected() {
            return Err(FeedError::Closed(format!("{} is not connected", self.exchange)));
        }

        let mut last_message = Instant::now();

        loop {
            match timeout(self.recv_timeout, self.client.recv()).await {
                Ok(Ok(Some(text))) => {
                    return Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)));
                }
                Ok(Ok(None)) => {
                    if last_message.elapsed() > self.recv_timeout {
                        self.client.ping().await?;
                        last_message = Instant::now();
                    }
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    warn!(
                        exchange = %self.exchange,
                        last_message_secs = last_message.elapsed().as_secs(),
                        "No message received within timeout, sending keepalive"
                    );
                    self.client.ping().await?;
                    last_message = Instant::now();
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl MessageSink for WebSocketManager {
    async fn send_json(&mut self, message: &Value) -> Result<()> {
        if !self.client.is_connected() {
            return Err(FeedError::Send(format!("{} is not connected", self.exchange)));
        }
        debug!(exchange = %self.exchange, "Sending message");
        self.client.send_json(message).await
    }
}

impl std::fmt::Debug for WebSocketManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketManager")
            .field("exchange", &self.exchange)
            .field("endpoint", &self.endpoint)
            .field("protocol", &self.protocol)
            .field("connected", &self.client.is_connected())
            .finish()
    }
}
