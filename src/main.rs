use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use benchscope::error::{BenchscopeError, Result};
use benchscope::interface::BenchInterface;
use benchscope::server;
use benchscope::settings::Settings;

fn preload(iface: &BenchInterface, path: &str) -> Result<()> {
    let json = std::fs::read_to_string(path)?;
    let summary = iface.load_json(&json)?;
    info!(path, rows = summary.rows, columns = summary.columns, "preloaded dataset");
    Ok(())
}

async fn run(settings: Settings) -> Result<()> {
    let iface = Arc::new(BenchInterface::new(&settings));
    if let Some(path) = settings.dataset_path.as_deref() {
        // a bad preload leaves the service up, waiting for an upload
        if let Err(e) = preload(&iface, path) {
            warn!(path, error = %e, "dataset preload failed");
        }
    }
    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    info!(address = %settings.bind_address, "benchscope listening");
    axum::serve(listener, server::router(iface))
        .await
        .map_err(BenchscopeError::from)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "could not load settings");
            std::process::exit(2);
        }
    };
    if let Err(e) = run(settings).await {
        error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
