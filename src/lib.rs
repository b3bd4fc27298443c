//! Exchange feed registry
//!
//! Given an exchange id, produces a websocket connection to that exchange's
//! public feed, wired with the messages that subscribe to (and unsubscribe
//! from) its order book and trade channels for a configured symbol set.

pub mod config;
pub mod error;
pub mod exchange;
pub mod protocol;
pub mod registry;
pub mod websocket;

pub use config::{Config, SymbolSet};
pub use error::{FeedError, Result};
pub use exchange::{Exchange, Support};
pub use protocol::{Channel, MessageSink, SubscriptionProtocol, Verb};
pub use registry::FactoryRegistry;
pub use websocket::{WebSocketClient, WebSocketManager};
