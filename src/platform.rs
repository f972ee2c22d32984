// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hosting platform layer.
//!
//! Some hosts stamp their own signature on responses and manage a few
//! headers (usually HSTS) at the edge. [`HostPlatform`] reproduces that
//! behaviour around the header pipeline:
//!
//! ```text
//! handler → stamp_signature → header policy → enforce_managed_headers → client
//! ```
//!
//! A managed header is written after the policy runs, so it wins unless the
//! platform relinquishes it at startup.

use crate::policy::{PolicyError, UpstreamControl};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// `[platform]` table of the policy settings file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PlatformSettings {
    /// Value of the identifying header, e.g. `"Express"`.
    pub signature: Option<String>,
    pub signature_header: String,
    /// Headers the platform writes on every response.
    pub managed: BTreeMap<String, String>,
    /// Release FORCE_SET headers from `managed` at startup.
    pub relinquish_forced: bool,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            signature: None,
            signature_header: "X-Powered-By".to_string(),
            managed: BTreeMap::new(),
            relinquish_forced: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HostPlatform {
    signature: Option<(HeaderName, HeaderValue)>,
    managed: HeaderMap,
}

impl HostPlatform {
    pub fn from_settings(settings: &PlatformSettings) -> Result<Self, PolicyError> {
        let signature = match &settings.signature {
            Some(value) => Some((
                parse_name(&settings.signature_header)?,
                parse_value(&settings.signature_header, value)?,
            )),
            None => None,
        };

        let mut managed = HeaderMap::new();
        for (name, value) in &settings.managed {
            managed.insert(parse_name(name)?, parse_value(name, value)?);
        }

        Ok(Self { signature, managed })
    }

    pub fn with_signature(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.signature = Some((name, value));
        self
    }

    pub fn with_managed(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.managed.insert(name, value);
        self
    }

    pub fn signature(&self) -> Option<&(HeaderName, HeaderValue)> {
        self.signature.as_ref()
    }

    pub fn is_managed(&self, name: &HeaderName) -> bool {
        self.managed.contains_key(name)
    }

    /// Headers still under platform control.
    pub fn managed(&self) -> &HeaderMap {
        &self.managed
    }
}

impl UpstreamControl for HostPlatform {
    fn relinquish(&mut self, name: &HeaderName) -> bool {
        self.managed.remove(name).is_some()
    }
}

fn parse_name(name: &str) -> Result<HeaderName, PolicyError> {
    if name.trim().is_empty() {
        return Err(PolicyError::EmptyHeaderName);
    }
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| PolicyError::InvalidHeaderName(name.to_string()))
}

fn parse_value(name: &str, value: &str) -> Result<HeaderValue, PolicyError> {
    HeaderValue::from_str(value).map_err(|_| PolicyError::InvalidHeaderValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Inner layer: the platform advertises itself on the way out.
pub async fn stamp_signature(
    State(platform): State<Arc<HostPlatform>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    if let Some((name, value)) = &platform.signature {
        response.headers_mut().insert(name.clone(), value.clone());
    }
    response
}

/// Outer layer: the platform rewrites the headers it still manages.
pub async fn enforce_managed_headers(
    State(platform): State<Arc<HostPlatform>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    for (name, value) in &platform.managed {
        headers.insert(name.clone(), value.clone());
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    fn hsts() -> HeaderName {
        HeaderName::from_static("strict-transport-security")
    }

    #[test]
    fn test_from_settings() {
        let mut settings = PlatformSettings {
            signature: Some("Express".to_string()),
            ..Default::default()
        };
        settings
            .managed
            .insert("Strict-Transport-Security".to_string(), "max-age=31536000".to_string());

        let platform = HostPlatform::from_settings(&settings).unwrap();
        let (name, value) = platform.signature().unwrap();
        assert_eq!(name, "x-powered-by");
        assert_eq!(value, "Express");
        assert!(platform.is_managed(&hsts()));
    }

    #[test]
    fn test_from_settings_rejects_bad_headers() {
        let mut settings = PlatformSettings::default();
        settings
            .managed
            .insert("bad header".to_string(), "1".to_string());
        assert!(matches!(
            HostPlatform::from_settings(&settings),
            Err(PolicyError::InvalidHeaderName(_))
        ));

        let settings = PlatformSettings {
            signature: Some("Express".to_string()),
            signature_header: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            HostPlatform::from_settings(&settings),
            Err(PolicyError::EmptyHeaderName)
        ));
    }

    #[test]
    fn test_relinquish() {
        let mut platform = HostPlatform::default()
            .with_managed(hsts(), HeaderValue::from_static("max-age=31536000"));
        assert!(platform.relinquish(&hsts()));
        assert!(!platform.is_managed(&hsts()));
        assert!(!platform.relinquish(&hsts()));
    }

    #[tokio::test]
    async fn test_platform_layers() {
        let platform = Arc::new(
            HostPlatform::default()
                .with_signature(
                    HeaderName::from_static("x-powered-by"),
                    HeaderValue::from_static("Express"),
                )
                .with_managed(hsts(), HeaderValue::from_static("max-age=31536000")),
        );

        let app = Router::new()
            .route(
                "/",
                get(|| async { ([("strict-transport-security", "max-age=5")], "Hello") }),
            )
            .layer(axum::middleware::from_fn_with_state(
                platform.clone(),
                stamp_signature,
            ))
            .layer(axum::middleware::from_fn_with_state(
                platform,
                enforce_managed_headers,
            ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get("x-powered-by").unwrap(), "Express");
        assert_eq!(
            headers.get("strict-transport-security").unwrap(),
            "max-age=31536000"
        );
    }
}
