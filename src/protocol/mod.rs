//! Subscription protocols
//!
//! Each exchange has its own wire dialect for subscribing to order book and
//! trade channels. A protocol value holds the symbol set it was built with and
//! renders the exact request sequence for either verb.

mod kraken;
mod okex;
mod phemex;

pub use kraken::{KrakenProtocol, KRAKEN_WS_URL};
pub use okex::{OkexProtocol, OKEX_WS_URL};
pub use phemex::{PhemexProtocol, PHEMEX_WS_URL};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::SymbolSet;
use crate::error::Result;

/// Subscription direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Subscribe,
    Unsubscribe,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Subscribe => "subscribe",
            Verb::Unsubscribe => "unsubscribe",
        }
    }
}

/// Market data channel category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Book,
    Trade,
}

impl Channel {
    /// Order in which channels are (un)subscribed
    pub const ALL: [Channel; 2] = [Channel::Book, Channel::Trade];
}

/// Destination for outbound JSON requests
#[async_trait]
pub trait MessageSink: Send {
    async fn send_json(&mut self, message: &Value) -> Result<()>;
}

/// Per-exchange subscribe/unsubscribe behaviour
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionProtocol {
    Kraken(KrakenProtocol),
    Okex(OkexProtocol),
    Phemex(PhemexProtocol),
}

impl SubscriptionProtocol {
    /// Render the request sequence for a verb without sending it
    pub fn messages(&self, verb: Verb) -> Result<Vec<Value>> {
        match self {
            SubscriptionProtocol::Kraken(p) => p.messages(verb),
            SubscriptionProtocol::Okex(p) => p.messages(verb),
            SubscriptionProtocol::Phemex(p) => p.messages(verb),
        }
    }

    pub fn symbols(&self) -> &SymbolSet {
        match self {
            SubscriptionProtocol::Kraken(p) => &p.symbols,
            SubscriptionProtocol::Okex(p) => &p.symbols,
            SubscriptionProtocol::Phemex(p) => &p.symbols,
        }
    }

    pub async fn subscribe<S>(&self, sink: &mut S) -> Result<()>
    where
        S: MessageSink + ?Sized,
    {
        self.send_all(Verb::Subscribe, sink).await
    }

    pub async fn unsubscribe<S>(&self, sink: &mut S) -> Result<()>
    where
        S: MessageSink + ?Sized,
    {
        self.send_all(Verb::Unsubscribe, sink).await
    }

    async fn send_all<S>(&self, verb: Verb, sink: &mut S) -> Result<()>
    where
        S: MessageSink + ?Sized,
    {
        let messages = self.messages(verb)?;
        debug!(verb = verb.as_str(), count = messages.len(), "Sending subscription requests");

        for message in &messages {
            sink.send_json(message).await?;
        }
        Ok(())
    }
}

/// Serialize a typed request into its wire JSON
pub(crate) fn to_wire<T: Serialize>(request: &T) -> Result<Value> {
    Ok(serde_json::to_value(request)?)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Sink that records everything sent to it
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub sent: Vec<Value>,
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send_json(&mut self, message: &Value) -> Result<()> {
            self.sent.push(message.clone());
            Ok(())
        }
    }

    pub fn symbols(raw: &[&str]) -> SymbolSet {
        SymbolSet::new("test", raw.iter().map(|s| s.to_string()).collect()).unwrap()
    }
}
