//! # Credential Issuer Stub
//!
//! Main entry point for the credential issuer stub server.

#![forbid(unsafe_code)]
#![deny(warnings)]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cis_server::config::StubConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StubConfig::from_env()?;
    let app = cis_server::app(&config)?;

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        issuer = %config.issuer,
        "credential issuer stub listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
