//! Accident Severity Dashboard - Main Entry Point

use anyhow::Context;
use api::{config::Settings, init_logging, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load dashboard settings")?;
    init_logging(&settings.logging);

    info!("=== Accident Severity Dashboard v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Model: {}, dataset: {} (first {} rows)",
        settings.model.path, settings.dataset.path, settings.dataset.sample_rows
    );

    run_server(settings)
        .await
        .context("dashboard server stopped")?;

    Ok(())
}
