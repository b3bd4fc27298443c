//! OKX (okex) v5 public subscription requests
//!
//! OKX takes one request per instrument and channel, so a symbol set of N
//! produces 2×N requests: book then trade for each symbol in turn.

use serde::Serialize;
use serde_json::Value;

use super::{to_wire, Channel, Verb};
use crate::config::SymbolSet;
use crate::error::Result;

/// OKX v5 public websocket endpoint
pub const OKEX_WS_URL: &str = "wss://ws.okex.com:8443/ws/v5/public";

#[derive(Debug, Serialize)]
struct OkexRequest<'a> {
    op: &'static str,
    args: [OkexArg<'a>; 1],
}

#[derive(Debug, Serialize)]
struct OkexArg<'a> {
    channel: &'static str,
    #[serde(rename = "instId")]
    inst_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OkexProtocol {
    pub(super) symbols: SymbolSet,
}

impl OkexProtocol {
    pub fn new(symbols: SymbolSet) -> Self {
        Self { symbols }
    }

    fn channel(channel: Channel) -> &'static str {
        match channel {
            Channel::Book => "books",
            Channel::Trade => "trades",
        }
    }

    pub fn messages(&self, verb: Verb) -> Result<Vec<Value>> {
        let mut messages = Vec::with_capacity(self.symbols.len() * Channel::ALL.len());

        for symbol in self.symbols.iter() {
            for channel in Channel::ALL {
                messages.push(to_wire(&OkexRequest {
                    op: verb.as_str(),
                    args: [OkexArg {
                        channel: Self::channel(channel),
                        inst_id: symbol,
                    }],
                })?);
            }
        }

        Ok(messages)
    }
}
