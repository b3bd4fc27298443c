//! Kraken Futures subscription requests
//!
//! One batched request per channel carrying every product id.

use serde::Serialize;
use serde_json::Value;

use super::{to_wire, Channel, Verb};
use crate::config::SymbolSet;
use crate::error::Result;

/// Kraken Futures public websocket endpoint
pub const KRAKEN_WS_URL: &str = "wss://futures.kraken.com/ws/v1";

/// Kraken subscribe/unsubscribe request
#[derive(Debug, Serialize)]
struct KrakenRequest<'a> {
    event: &'static str,
    feed: &'static str,
    product_ids: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrakenProtocol {
    pub(super) symbols: SymbolSet,
}

impl KrakenProtocol {
    pub fn new(symbols: SymbolSet) -> Self {
        Self { symbols }
    }

    fn feed(channel: Channel) -> &'static str {
        match channel {
            Channel::Book => "book",
            Channel::Trade => "trade",
        }
    }

    pub fn messages(&self, verb: Verb) -> Result<Vec<Value>> {
        Channel::ALL
            .iter()
            .map(|&channel| {
                to_wire(&KrakenRequest {
                    event: verb.as_str(),
                    feed: Self::feed(channel),
                    product_ids: self.symbols.as_slice(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::testing::symbols;
    use serde_json::json;

    #[test]
    fn test_batches_all_symbols_per_channel() {
        let protocol = KrakenProtocol::new(symbols(&["PI_XBTUSD", "PI_ETHUSD", "PF_SOLUSD"]));
        let messages = protocol.messages(Verb::Subscribe).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["feed"], "book");
        assert_eq!(messages[1]["feed"], "trade");
        for message in &messages {
            assert_eq!(
                message["product_ids"],
                json!(["PI_XBTUSD", "PI_ETHUSD", "PF_SOLUSD"])
            );
        }
    }

    #[test]
    fn test_unsubscribe_verb() {
        let protocol = KrakenProtocol::new(symbols(&["PI_XBTUSD"]));
        let messages = protocol.messages(Verb::Unsubscribe).unwrap();

        assert_eq!(
            messages[0],
            json!({"event": "unsubscribe", "feed": "book", "product_ids": ["PI_XBTUSD"]})
        );
        assert_eq!(
            messages[1],
            json!({"event": "unsubscribe", "feed": "trade", "product_ids": ["PI_XBTUSD"]})
        );
    }
}
