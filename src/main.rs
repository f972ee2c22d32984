// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Header-Shield server
//!
//! Serves static files and a small internal API behind a fixed set of
//! security response headers.

use header_shield::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load configuration"))?;
    tracing::info!(port = config.port, "Starting Header-Shield");

    // Fail closed: never bind without a valid header policy.
    let state = AppState::load(config.clone())
        .inspect_err(|e| tracing::error!(error = %e, "Invalid header policy"))?;
    tracing::info!(
        rules = state.policy.len(),
        managed_by_platform = state.platform.managed().len(),
        "Header policy ready"
    );

    let app = header_shield::routes::create_router(Arc::new(state));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, static_dir = %config.static_dir.display(), "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "header_shield=debug,info".into()),
        )
        .with(format)
        .init();
}
