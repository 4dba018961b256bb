//! Signal notifier entry point

use anyhow::{Context, Result};
use bingx_adapter::BingxClient;
use clap::Parser;
use order_block_strategy::Scanner;
use signal_notifier::{NotifierConfig, NotifierService, ServiceSettings, TelegramClient};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (defaults to $OBSCAN_CONFIG_PATH or configs/scanner.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overlay configs/environments/<name>.toml
    #[arg(short, long)]
    environment: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let path = args
        .config
        .unwrap_or_else(|| config::resolve_config_path("OBSCAN_CONFIG_PATH", "configs/scanner.toml"));
    let config = NotifierConfig::load(&path, args.environment.as_deref())
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting order-block signal notifier");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let provider = BingxClient::new(config.exchange.clone()).context("Failed to create BingX client")?;
    let telegram = TelegramClient::new(&config.telegram).context("Failed to create Telegram client")?;
    if let Err(e) = telegram.delete_webhook().await {
        warn!("Could not delete webhook: {}", e);
    }

    let scanner = Scanner::new(provider, config.signal.clone(), config.scan.candle_limit);
    let settings = ServiceSettings::from_config(&config)?;
    let mut service = NotifierService::new(scanner, telegram, settings);

    service.run(shutdown_signal()).await;

    info!("Notifier stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
