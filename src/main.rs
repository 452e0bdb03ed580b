// Main entry point - Dependency wiring and command dispatch
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use torque_dashboard::infrastructure::config::load_dashboard_config;
use torque_dashboard::infrastructure::http_client::ReqwestHttpClient;
use torque_dashboard::presentation::app_state::AppState;
use torque_dashboard::presentation::cli::Args;
use torque_dashboard::presentation::handlers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Views go to stdout, logs to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_dashboard_config(args.config.as_deref())?;
    tracing::debug!("Using API at {}", config.endpoints().base());

    let http = Arc::new(ReqwestHttpClient::new(reqwest::Client::new()));
    let state = AppState::new(http, &config);

    handlers::run(&state, args.command).await
}
