use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod state;
mod utils;

use api::ExplorerClient;
use config::Config;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout belongs to the live table
    let mut filter = EnvFilter::from_default_env();
    for directive in ["da_feed=info", "tungstenite=warn", "tokio_tungstenite=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📡 Starting da-feed v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    info!(
        "Environment: {} [{}] (api {}, socket {})",
        config.environment.name,
        config.environment.id,
        config.environment.api_endpoint,
        config.socket_endpoint()
    );

    let client = match ExplorerClient::new(
        config.environment.api_endpoint.clone(),
        config.api_rate_limit,
        config.api_timeout,
    ) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to create explorer client: {}", e);
            std::process::exit(2);
        }
    };
    let state = AppState::new(config.environment.clone());

    if let Err(e) = services::feed_service::run(config, client, state).await {
        error!("Feed error: {}", e);
        std::process::exit(1);
    }

    info!("👋 Bye");
}
