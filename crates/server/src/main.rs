use std::{fs::OpenOptions, path::Path, sync::Arc};

use anyhow::{Context, Result};
use gametrack_core::config::{self, AppConfig};
use gametrack_server::AppState;
use tracing::warn;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config.server.log_dir)?;

    if config.catalog.credentials().is_none() {
        warn!(
            "{} / {} not set; catalog endpoints will answer with an error",
            config::CLIENT_ID_VAR,
            config::ACCESS_TOKEN_VAR
        );
    }

    let state = Arc::new(AppState::from_config(&config)?);
    gametrack_server::serve(state, &config.server.bind).await
}

fn init_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("gametrack.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
