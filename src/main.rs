//! OTP Relay - Entry point.

use otp_relay::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    config::Config,
    provider,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OTP relay");

    // Build the configured provider backend
    let provider = match provider::from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create provider client: {}", e);
            std::process::exit(1);
        }
    };

    info!(provider = provider.name(), "Provider backend selected");

    // Create application state and router
    let state = AppState::new(provider);
    let rate_limit = RateLimitState::new(config.rate_limit_per_minute);
    let app = create_router_with_rate_limit(state, rate_limit);

    // Bind to address; Config::load has already validated the format
    let ip = match config.listen_addr.parse() {
        Ok(ip) => ip,
        Err(e) => {
            error!("Invalid listen address {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };
    let addr = SocketAddr::new(ip, config.port);

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
