mod app;
mod config;
mod errors;
mod external;
mod jobs;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TrackerConfig;
use crate::external::github::{DispatchConfig, WorkflowDispatcher};
use crate::external::yahoo::YahooProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "serve".to_string());
    match mode.as_str() {
        "fetch" => fetch().await,
        "serve" => serve().await,
        other => {
            eprintln!("Unknown mode '{}'. Use 'serve' or 'fetch'.", other);
            std::process::exit(2);
        }
    }
}

/// One refresh pass: build all three JSON snapshots and exit.
async fn fetch() -> Result<(), Box<dyn std::error::Error>> {
    let config = TrackerConfig::load()?;
    let provider = YahooProvider::new();

    jobs::refresh_job::run(&config, &provider).await?;
    Ok(())
}

/// Long-running mode: serve the refresh-trigger endpoint.
async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let dispatch_config = DispatchConfig::from_env();
    if dispatch_config.is_none() {
        tracing::warn!("GitHub dispatch configuration incomplete; POST / will answer 500");
    }

    let state = AppState {
        dispatcher: Arc::new(WorkflowDispatcher::new(dispatch_config)),
    };
    let app = app::create_app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 UsTracker trigger endpoint running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
