//! Feed registry driver
//!
//! Connects to one exchange feed and prints every message as a JSON line
//! until interrupted.

use std::io::Write;

use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feed_registry::{Config, FactoryRegistry, WebSocketManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only feed messages
    tracing_subscriber::registry()
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let mut config = Config::load()?;
    if let Some(exchange) = std::env::args().nth(1) {
        config.exchange = exchange;
    }
    info!(
        exchange = %config.exchange,
        symbol_config_dir = %config.symbol_config_dir.display(),
        "Configuration loaded"
    );

    let registry = FactoryRegistry::from_config(&config)?;
    let mut ws_manager = registry.get_connection(&config.exchange)?;
    ws_manager.connect().await?;

    let outcome = tokio::select! {
        result = pump(&mut ws_manager) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    };

    if let Err(e) = &outcome {
        error!(error = %e, "Feed terminated");
    }

    let disconnected = ws_manager.disconnect().await;
    settle(outcome, disconnected)
}

/// The feed error wins over a failed disconnect; the latter is only logged
fn settle(
    outcome: anyhow::Result<()>,
    disconnected: feed_registry::Result<()>,
) -> anyhow::Result<()> {
    match (outcome, disconnected) {
        (Err(feed), Err(e)) => {
            warn!(error = %e, "Disconnect failed after feed error");
            Err(feed)
        }
        (Err(feed), Ok(())) => Err(feed),
        (Ok(()), disconnected) => Ok(disconnected?),
    }
}

/// Forward every inbound message to stdout
async fn pump(ws_manager: &mut WebSocketManager) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    loop {
        let message = ws_manager.receive().await?;
        let mut out = stdout.lock();
        serde_json::to_writer(&mut out, &message)?;
        writeln!(out)?;
    }
}
