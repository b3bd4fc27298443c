//! Configuration module for the feed registry
//!
//! Runtime settings come from the environment; symbol lists come from one
//! INI file per exchange.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FeedError, Result};

/// Directory holding `<exchange>.ini` symbol files when nothing else is set
pub const DEFAULT_SYMBOL_CONFIG_DIR: &str = "symbol_configs";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Exchange the driver connects to (e.g., "kraken")
    pub exchange: String,

    /// Directory containing per-exchange symbol files
    pub symbol_config_dir: PathBuf,

    /// Timeout for the initial websocket handshake
    pub connect_timeout_secs: u64,

    /// Quiet period after which a keepalive ping is sent
    pub recv_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            exchange: env::var("EXCHANGE").unwrap_or(defaults.exchange),
            symbol_config_dir: env::var("SYMBOL_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.symbol_config_dir),
            connect_timeout_secs: parse_secs(
                env::var("CONNECT_TIMEOUT_SECS").ok(),
                defaults.connect_timeout_secs,
            ),
            recv_timeout_secs: parse_secs(
                env::var("RECV_TIMEOUT_SECS").ok(),
                defaults.recv_timeout_secs,
            ),
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_secs(self.recv_timeout_secs)
    }
}

/// Parse a timeout in seconds; zero and garbage fall back to `default`
fn parse_secs(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exchange: "kraken".to_string(),
            symbol_config_dir: PathBuf::from(DEFAULT_SYMBOL_CONFIG_DIR),
            connect_timeout_secs: 10,
            recv_timeout_secs: 45,
        }
    }
}

/// Ordered, non-empty list of instruments for one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet(Vec<String>);

impl SymbolSet {
    /// Build a symbol set, rejecting an empty list
    pub fn new(exchange: &str, symbols: Vec<String>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(FeedError::config_load(exchange, "symbol list is empty"));
        }
        Ok(Self(symbols))
    }

    /// Load `<dir>/<exchange>.ini`, reading the JSON array under
    /// `[DEFAULT] symbols`.
    pub fn load(dir: &Path, exchange: &str) -> Result<Self> {
        let path = dir.join(format!("{exchange}.ini"));
        if !path.is_file() {
            return Err(FeedError::config_load(
                exchange,
                format!("{} not found", path.display()),
            ));
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Ini)
                    .required(true),
            )
            .build()
            .map_err(|e| FeedError::config_load(exchange, e))?;

        // Section names are case-folded by some versions of the INI source.
        let raw = settings
            .get_string("default.symbols")
            .or_else(|_| settings.get_string("DEFAULT.symbols"))
            .map_err(|e| FeedError::config_load(exchange, e))?;

        Self::parse(exchange, &raw)
    }

    /// Parse a JSON array of symbol strings.
    pub fn parse(exchange: &str, raw: &str) -> Result<Self> {
        let symbols: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| FeedError::config_load(exchange, format!("invalid symbol list: {e}")))?;

        Self::new(exchange, symbols)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_ini(dir: &Path, exchange: &str, body: &str) {
        fs::write(dir.join(format!("{exchange}.ini")), body).unwrap();
    }

    #[test]
    fn test_load_symbols() {
        let dir = tempfile::tempdir().unwrap();
        write_ini(
            dir.path(),
            "kraken",
            "[DEFAULT]\nsymbols = [\"PI_XBTUSD\", \"PI_ETHUSD\"]\n",
        );

        let symbols = SymbolSet::load(dir.path(), "kraken").unwrap();
        assert_eq!(symbols.as_slice(), ["PI_XBTUSD", "PI_ETHUSD"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SymbolSet::load(dir.path(), "okex").unwrap_err();
        assert!(matches!(err, FeedError::ConfigLoad { ref exchange, .. } if exchange == "okex"));
    }

    #[test]
    fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        write_ini(dir.path(), "okex", "[DEFAULT]\ninstruments = [\"BTC-USDT\"]\n");

        let err = SymbolSet::load(dir.path(), "okex").unwrap_err();
        assert!(matches!(err, FeedError::ConfigLoad { .. }));
    }

    #[test]
    fn test_parse_rejects_malformed_list() {
        assert!(SymbolSet::parse("kraken", "PI_XBTUSD").is_err());
        assert!(SymbolSet::parse("kraken", "[1, 2]").is_err());
        assert!(SymbolSet::parse("kraken", "{\"a\": \"b\"}").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_list() {
        let err = SymbolSet::parse("phemex", "[]").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_new_rejects_empty_list() {
        let err = SymbolSet::new("kraken", Vec::new()).unwrap_err();
        assert!(matches!(err, FeedError::ConfigLoad { ref exchange, .. } if exchange == "kraken"));

        let symbols = SymbolSet::new("kraken", vec!["PI_XBTUSD".to_string()]).unwrap();
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs(Some("30".to_string()), 45), 30);
        assert_eq!(parse_secs(Some(" 5 ".to_string()), 45), 5);
        assert_eq!(parse_secs(Some("0".to_string()), 45), 45);
        assert_eq!(parse_secs(Some("-3".to_string()), 10), 10);
        assert_eq!(parse_secs(Some("soon".to_string()), 10), 10);
        assert_eq!(parse_secs(None, 10), 10);
    }

    #[test]
    fn test_parse_preserves_order() {
        let symbols = SymbolSet::parse("okex", r#"["ETH-USDT", "BTC-USDT"]"#).unwrap();
        let collected: Vec<&String> = symbols.iter().collect();
        assert_eq!(collected, ["ETH-USDT", "BTC-USDT"]);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.exchange, "kraken");
        assert_eq!(config.recv_timeout(), Duration::from_secs(45));
        assert_eq!(config.symbol_config_dir, PathBuf::from(DEFAULT_SYMBOL_CONFIG_DIR));
    }
}
