//! Phemex subscription requests
//!
//! Phemex batches every symbol into `params`. Only subscribe requests are
//! sent; closing the socket drops the subscriptions.

use serde::Serialize;
use serde_json::Value;

use super::{to_wire, Channel, Verb};
use crate::config::SymbolSet;
use crate::error::Result;

/// Phemex public websocket endpoint
pub const PHEMEX_WS_URL: &str = "wss://phemex.com/ws";

#[derive(Debug, Serialize)]
struct PhemexRequest<'a> {
    id: u64,
    method: &'static str,
    params: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhemexProtocol {
    pub(super) symbols: SymbolSet,
}

impl PhemexProtocol {
    pub fn new(symbols: SymbolSet) -> Self {
        Self { symbols }
    }

    fn method(channel: Channel) -> &'static str {
        match channel {
            Channel::Book => "orderbook.subscribe",
            Channel::Trade => "trade.subscribe",
        }
    }

    pub fn messages(&self, verb: Verb) -> Result<Vec<Value>> {
        if verb == Verb::Unsubscribe {
            return Ok(Vec::new());
        }

        Channel::ALL
            .iter()
            .map(|&channel| {
                to_wire(&PhemexRequest {
                    id: 0,
                    method: Self::method(channel),
                    params: self.symbols.as_slice(),
                })
            })
            .collect()
    }
}
