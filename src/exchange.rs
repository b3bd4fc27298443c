//! Exchange builders
//!
//! Every supported venue is a variant of [`Exchange`]. Building a variant
//! loads its symbol set (when it has one) and produces a fresh
//! [`WebSocketManager`] wired with the venue's subscription protocol.

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::SymbolSet;
use crate::error::Result;
use crate::protocol::{
    KrakenProtocol, OkexProtocol, PhemexProtocol, SubscriptionProtocol, KRAKEN_WS_URL,
    OKEX_WS_URL, PHEMEX_WS_URL,
};
use crate::websocket::WebSocketManager;

/// Exchanges the registry knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exchange {
    Okex,
    Phemex,
    Kraken,
    Kucoin,
    Deribit,
    Ftx,
}

/// How far an exchange integration goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// Endpoint and subscription protocol, symbols from config
    Configured,
    /// Placeholder: no endpoint, no subscriptions
    Unimplemented,
}

impl Exchange {
    pub const ALL: [Exchange; 6] = [
        Exchange::Okex,
        Exchange::Phemex,
        Exchange::Kraken,
        Exchange::Kucoin,
        Exchange::Deribit,
        Exchange::Ftx,
    ];

    /// Registry key, also the symbol config file stem
    pub fn id(&self) -> &'static str {
        match self {
            Exchange::Okex => "okex",
            Exchange::Phemex => "phemex",
            Exchange::Kraken => "kraken",
            Exchange::Kucoin => "kucoin",
            Exchange::Deribit => "deribit",
            Exchange::Ftx => "ftx",
        }
    }

    pub fn support(&self) -> Support {
        match self {
            Exchange::Okex | Exchange::Phemex | Exchange::Kraken => Support::Configured,
            Exchange::Kucoin | Exchange::Deribit | Exchange::Ftx => Support::Unimplemented,
        }
    }

    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Exchange::Okex => Some(OKEX_WS_URL),
            Exchange::Phemex => Some(PHEMEX_WS_URL),
            Exchange::Kraken => Some(KRAKEN_WS_URL),
            Exchange::Kucoin | Exchange::Deribit | Exchange::Ftx => None,
        }
    }

    /// Build a new connection handle, loading symbols from `symbol_dir`
    pub fn build(&self, symbol_dir: &Path) -> Result<WebSocketManager> {
        let protocol = self.protocol(symbol_dir)?;
        if self.support() == Support::Unimplemented {
            warn!(exchange = %self, "Exchange feed not implemented, handle has no endpoint");
        }

        debug!(exchange = %self, endpoint = ?self.endpoint(), "Built websocket manager");

        Ok(WebSocketManager::new(
            self.id(),
            self.endpoint().map(str::to_string),
            protocol,
        ))
    }

    fn protocol(&self, symbol_dir: &Path) -> Result<Option<SubscriptionProtocol>> {
        let symbols = || SymbolSet::load(symbol_dir, self.id());

        Ok(match self {
            Exchange::Okex => Some(SubscriptionProtocol::Okex(OkexProtocol::new(symbols()?))),
            Exchange::Phemex => Some(SubscriptionProtocol::Phemex(PhemexProtocol::new(symbols()?))),
            Exchange::Kraken => Some(SubscriptionProtocol::Kraken(KrakenProtocol::new(symbols()?))),
            Exchange::Kucoin | Exchange::Deribit | Exchange::Ftx => None,
        })
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
