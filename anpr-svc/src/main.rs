//! anpr-svc - License Plate Recognition microservice
//!
//! Turns a client-supplied image (inline bytes, or an identifier resolved
//! against the remote image store) into a recognized plate string, or a
//! well-defined error.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use anpr_svc::config::{self, CliArgs, Config, TomlConfig};
use anpr_svc::engine::CommandPlateReader;
use anpr_svc::store::HttpImageStore;
use anpr_svc::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting anpr-svc (Plate Recognition) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = CliArgs::parse();
    let toml_config = match &args.config {
        Some(path) => config::load_toml(path)?,
        None => TomlConfig::default(),
    };
    let config = Config::resolve(&args, &toml_config);
    info!("Image store: {}", config.image_store_url);
    info!("Recognizer command: {}", config.recognizer_cmd);

    let engine = Arc::new(CommandPlateReader::new(config.recognizer_cmd.as_str()));
    let store = Arc::new(HttpImageStore::new(config.image_store_url.as_str())?);

    let state = AppState::new(engine, store);
    let app = anpr_svc::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("anpr-svc listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
