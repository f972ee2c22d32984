// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Security headers middleware.

use crate::policy::HeaderPolicy;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Run the header policy on every response, whatever route produced it.
pub async fn apply_header_policy(
    State(policy): State<Arc<HeaderPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    policy.apply(response.headers_mut());
    tracing::trace!(rules = policy.len(), "Applied header policy");
    response
}
