// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Internal API mounted under `/_api`.

use crate::error::AppError;
use crate::policy::RuleAction;
use crate::AppState;
use axum::{
    extract::{OriginalUri, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/policy", get(get_policy))
        .fallback(not_found)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

// ─── Effective Policy ────────────────────────────────────────

/// One enabled rule, as the pipeline runs it.
#[derive(Debug, Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub action: RuleAction,
    pub value: Option<String>,
}

/// List the compiled header rules in application order.
async fn get_policy(State(state): State<Arc<AppState>>) -> Json<Vec<RuleSummary>> {
    let rules = state
        .policy
        .rules()
        .iter()
        .map(|rule| RuleSummary {
            name: rule.name().to_string(),
            action: rule.action(),
            value: rule
                .value()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned()),
        })
        .collect();
    Json(rules)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
