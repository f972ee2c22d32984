// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Internal API tests.

use axum::http::StatusCode;
use serde_json::Value;

mod common;

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = common::create_test_app();
    let response = common::get(app, "/_api/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_policy_lists_enabled_rules_in_order() {
    let (app, _) = common::create_test_app();
    let response = common::get(app, "/_api/policy").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let rules = body.as_array().unwrap();

    let names: Vec<_> = rules.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "x-powered-by",
            "x-frame-options",
            "x-xss-protection",
            "x-content-type-options",
            "x-download-options",
            "strict-transport-security",
            "x-dns-prefetch-control",
            "content-security-policy",
        ]
    );

    let hsts = &rules[5];
    assert_eq!(hsts["action"], "FORCE_SET");
    assert_eq!(hsts["value"], "max-age=7776000");
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let (app, _) = common::create_test_app();
    let response = common::get(app, "/_api/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["details"], "/_api/nope");
}
