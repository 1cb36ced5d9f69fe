//! paddock-server — membership service for the owners club
//!
//! Long-running service that:
//! - Registers members (member code allocation + email verification)
//! - Serves member self-service (profile, vehicles) behind JWT sessions
//! - Answers public QR membership checks (read-only)
//! - Records vendor deals and admin lifecycle changes (audit logged)

mod api;
mod auth;
mod config;
mod db;
mod email;
mod membercode;
mod state;
mod util;
mod validation;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paddock_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting paddock-server (env: {})", config.environment);

    // Initialize application state (pool, migrations, SES, rate limiter)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state.clone());

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("paddock-server listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
