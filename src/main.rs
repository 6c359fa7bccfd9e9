use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use testtrack::config::Args;
use testtrack::rate_limit::{MAX_REQUESTS, WINDOW};
use testtrack::state::AppState;

// this is main async function with tokio
#[tokio::main]
async fn main() {
    // parse cli arguments
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("testtrack=info")),
        )
        .init();

    // creating shared state
    let state = Arc::new(AppState::new());
    let app = testtrack::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("testtrack running on http://localhost:{}", args.port);
    tracing::info!(
        "rate limit: {} requests per {} seconds per API key",
        MAX_REQUESTS,
        WINDOW.as_secs()
    );
    axum::serve(listener, app).await.unwrap();
}
