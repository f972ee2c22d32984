// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use header_shield::config::Config;
use header_shield::policy::PolicySettings;
use header_shield::routes::create_router;
use header_shield::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app from `settings`, serving the repository's `public/`.
#[allow(dead_code)]
pub fn create_test_app_with(settings: &PolicySettings) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(
        AppState::from_settings(Config::default(), settings).expect("Policy should build"),
    );
    (create_router(state.clone()), state)
}

/// Create a test app with the default header policy.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(&PolicySettings::default())
}

/// Send a GET request through the router.
#[allow(dead_code)]
pub async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Split a CSP header into `(directive, sources)` pairs.
#[allow(dead_code)]
pub fn parse_csp(value: &str) -> Vec<(String, Vec<String>)> {
    value
        .split(';')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(|clause| {
            let mut parts = clause.split_whitespace();
            let name = parts.next().unwrap_or_default().to_ascii_lowercase();
            (name, parts.map(str::to_string).collect())
        })
        .collect()
}
