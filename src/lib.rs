// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Header-Shield: a static site and API server that applies a fixed
//! security header policy to every response.
//!
//! The policy is built once at startup from [`policy::PolicySettings`] and
//! shared read-only by all request handlers.

pub mod config;
pub mod error;
pub mod middleware;
pub mod platform;
pub mod policy;
pub mod routes;

use config::Config;
use platform::HostPlatform;
use policy::{HeaderPolicy, PolicyError, PolicySettings};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub policy: Arc<HeaderPolicy>,
    pub platform: Arc<HostPlatform>,
}

impl AppState {
    /// Load the settings named by `config` and build the policy.
    ///
    /// Called before the listener is bound; an error here means the server
    /// never starts.
    pub fn load(config: Config) -> Result<Self, PolicyError> {
        let settings = PolicySettings::load(config.policy_file.as_deref())?;
        Self::from_settings(config, &settings)
    }

    /// Build the header policy from `settings`. Fails on any malformed rule.
    pub fn from_settings(config: Config, settings: &PolicySettings) -> Result<Self, PolicyError> {
        let (policy, platform) = settings.build()?;
        Ok(Self {
            config,
            policy: Arc::new(policy),
            platform: Arc::new(platform),
        })
    }
}
