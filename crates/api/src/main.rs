//! Temper - Main Entry Point

use api::{init_logging, run_server, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::load()?;
    init_logging(&config.log).map_err(|e| e as Box<dyn std::error::Error>)?;

    info!("=== Temper v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Database file: {}", config.db.filename);

    run_server(config).await?;

    Ok(())
}
