// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP routes.

pub mod api;

use crate::middleware::apply_header_policy;
use crate::platform::{enforce_managed_headers, stamp_signature};
use crate::AppState;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Mount point of the internal API.
pub const API_PREFIX: &str = "/_api";

/// Build the complete router with all routes.
///
/// The header policy wraps both the API and the static files, so every
/// response gets the same headers regardless of which handler served it.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .nest(API_PREFIX, api::routes())
        .fallback_service(static_files)
        .layer(middleware::from_fn_with_state(
            state.platform.clone(),
            stamp_signature,
        ))
        .layer(middleware::from_fn_with_state(
            state.policy.clone(),
            apply_header_policy,
        ))
        .layer(middleware::from_fn_with_state(
            state.platform.clone(),
            enforce_managed_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
