//! Pricing Simulator
//!
//! Entry point. Loads configuration, initialises structured logging, and
//! serves the interactive pricing dashboard until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use pricing_simulator::config::AppConfig;
use pricing_simulator::dashboard::{self, routes::DashboardState};

const BANNER: &str = r#"
  ____       _      _               ____  _
 |  _ \ _ __(_) ___(_)_ __   __ _  / ___|(_)_ __ ___
 | |_) | '__| |/ __| | '_ \ / _` | \___ \| | '_ ` _ \
 |  __/| |  | | (__| | | | | (_| |  ___) | | | | | | |
 |_|   |_|  |_|\___|_|_| |_|\__, | |____/|_|_| |_| |_|
                            |___/
  Cost-Plus | Tiered | Value-Based
"#;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cfg = AppConfig::load_or_default(CONFIG_PATH)?;

    println!("{BANNER}");
    info!(
        addr = %cfg.bind_addr(),
        default_strategy = %cfg.defaults.strategy,
        default_margin_pct = cfg.defaults.margin_pct,
        max_upload_bytes = cfg.server.max_upload_bytes,
        "Pricing Simulator starting up"
    );

    let state = Arc::new(DashboardState::new(
        cfg.defaults.clone(),
        cfg.server.max_upload_bytes,
    ));

    dashboard::serve(state, &cfg.bind_addr(), shutdown_signal()).await?;

    info!("Pricing Simulator shut down cleanly.");
    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received."),
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pricing_simulator=info"));

    let json_logging = std::env::var("PRICESIM_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
