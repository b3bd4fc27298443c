//! Factory registry
//!
//! Maps an exchange id to its builder. Populated once at construction; every
//! lookup builds a fresh, caller-owned [`WebSocketManager`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::exchange::Exchange;
use crate::websocket::{WebSocketManager, DEFAULT_CONNECT_TIMEOUT, DEFAULT_RECV_TIMEOUT};

/// Registry of exchange websocket factories
#[derive(Debug, Clone)]
pub struct FactoryRegistry {
    factories: HashMap<&'static str, Exchange>,
    /// Registration order, for listing
    order: Vec<Exchange>,
    symbol_config_dir: PathBuf,
    connect_timeout: Duration,
    recv_timeout: Duration,
}

impl FactoryRegistry {
    /// Create a registry with every supported exchange
    pub fn new(symbol_config_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_exchanges(symbol_config_dir, &Exchange::ALL)
    }

    /// Create a registry from runtime configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new(&config.symbol_config_dir)?;
        registry.connect_timeout = config.connect_timeout();
        registry.recv_timeout = config.recv_timeout();
        Ok(registry)
    }

    /// Create a registry with an explicit exchange list. Duplicates are rejected.
    pub fn with_exchanges(
        symbol_config_dir: impl Into<PathBuf>,
        exchanges: &[Exchange],
    ) -> Result<Self> {
        let mut registry = Self {
            factories: HashMap::with_capacity(exchanges.len()),
            order: Vec::with_capacity(exchanges.len()),
            symbol_config_dir: symbol_config_dir.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            recv_timeout: DEFAULT_RECV_TIMEOUT,
        };

        for &exchange in exchanges {
            registry.register(exchange)?;
        }

        debug!(exchanges = ?registry.supported().collect::<Vec<_>>(), "Factory registry ready");
        Ok(registry)
    }

    fn register(&mut self, exchange: Exchange) -> Result<()> {
        if self.factories.insert(exchange.id(), exchange).is_some() {
            return Err(FeedError::DuplicateRegistration {
                exchange: exchange.id().to_string(),
            });
        }
        self.order.push(exchange);
        Ok(())
    }

    /// Build a new connection handle for `exchange_id`
    pub fn get_connection(&self, exchange_id: &str) -> Result<WebSocketManager> {
        let exchange = self
            .factories
            .get(exchange_id)
            .ok_or_else(|| FeedError::NotRegistered {
                exchange: exchange_id.to_string(),
            })?;

        info!(exchange = %exchange, "Creating websocket manager");

        Ok(exchange
            .build(&self.symbol_config_dir)?
            .with_timeouts(self.connect_timeout, self.recv_timeout))
    }

    /// Registered exchange ids in registration order
    pub fn supported(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().map(Exchange::id)
    }

    pub fn contains(&self, exchange_id: &str) -> bool {
        self.factories.contains_key(exchange_id)
    }

    pub fn symbol_config_dir(&self) -> &Path {
        &self.symbol_config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn registry_with(files: &[(&str, &str)]) -> (tempfile::TempDir, FactoryRegistry) {
        let dir = tempfile::tempdir().unwrap();
        for (exchange, symbols) in files {
            fs::write(
                dir.path().join(format!("{exchange}.ini")),
                format!("[DEFAULT]\nsymbols = {symbols}\n"),
            )
            .unwrap();
        }
        let registry = FactoryRegistry::new(dir.path()).unwrap();
        (dir, registry)
    }

    #[test]
    fn test_supported_list() {
        let (_dir, registry) = registry_with(&[]);
        let supported: Vec<_> = registry.supported().collect();
        assert_eq!(supported, ["okex", "phemex", "kraken", "kucoin", "deribit", "ftx"]);
        assert!(registry.contains("kraken"));
        assert!(!registry.contains("binance"));
    }

    #[test]
    fn test_unknown_exchange() {
        let (_dir, registry) = registry_with(&[]);
        let err = registry.get_connection("binance").unwrap_err();
        assert!(matches!(err, FeedError::NotRegistered { ref exchange } if exchange == "binance"));
        assert_eq!(err.to_string(), "exchange id binance not registered as a factory");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let (_dir, registry) = registry_with(&[("kraken", r#"["PI_XBTUSD"]"#)]);
        assert!(registry.get_connection("kraken").is_ok());
        assert!(matches!(
            registry.get_connection("Kraken"),
            Err(FeedError::NotRegistered { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let err = FactoryRegistry::with_exchanges(
            "symbol_configs",
            &[Exchange::Kraken, Exchange::Okex, Exchange::Kraken],
        )
        .unwrap_err();
        assert!(matches!(err, FeedError::DuplicateRegistration { ref exchange } if exchange == "kraken"));
    }

    #[test]
    fn test_partial_registry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = FactoryRegistry::with_exchanges(dir.path(), &[Exchange::Ftx]).unwrap();
        assert!(registry.get_connection("ftx").is_ok());
        assert!(matches!(
            registry.get_connection("okex"),
            Err(FeedError::NotRegistered { .. })
        ));
    }

    #[test]
    fn test_from_config_applies_timeouts() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            symbol_config_dir: dir.path().to_path_buf(),
            connect_timeout_secs: 2,
            recv_timeout_secs: 5,
            ..Config::default()
        };

        let registry = FactoryRegistry::from_config(&config).unwrap();
        assert_eq!(registry.connect_timeout, Duration::from_secs(2));
        assert_eq!(registry.recv_timeout, Duration::from_secs(5));
        assert_eq!(registry.symbol_config_dir(), dir.path());
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FactoryRegistry>();
    }
}
