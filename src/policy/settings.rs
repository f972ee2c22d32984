// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Policy settings: one table per built-in rule, loaded from TOML.
//!
//! Every table rejects unknown keys so a misspelled option stops startup
//! instead of silently falling back to a default.
//!
//! ```toml
//! opt_in = ["no_cache"]
//!
//! [hsts]
//! max_age = 7776000
//! force = true
//!
//! [content_security_policy]
//! trusted_script_sources = ["trusted-cdn.com"]
//!
//! [[custom]]
//! name = "Referrer-Policy"
//! action = "SET_IF_ABSENT"
//! value = "no-referrer"
//! ```

use super::csp::{ContentSecurityPolicy, Directive};
use super::rule::HeaderRule;
use super::{HeaderPolicy, PolicyError};
use crate::platform::{HostPlatform, PlatformSettings};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_DECOY: &str = "PHP 7.4.3";
pub const DEFAULT_HSTS_MAX_AGE: u64 = 7_776_000;
pub const DEFAULT_TRUSTED_SCRIPT_SOURCE: &str = "trusted-cdn.com";

const NO_CACHE_HEADERS: &[(&str, &str)] = &[
    (
        "Cache-Control",
        "no-store, no-cache, must-revalidate, proxy-revalidate",
    ),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
    ("Surrogate-Control", "no-store"),
];

fn default_true() -> bool {
    true
}

/// On/off switch for rules with a fixed value.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Toggle {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for Toggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HideSignature {
    pub enabled: bool,
    /// Replacement value. An empty decoy strips the header instead.
    pub decoy: String,
}

impl Default for HideSignature {
    fn default() -> Self {
        Self {
            enabled: true,
            decoy: DEFAULT_DECOY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Hsts {
    pub enabled: bool,
    pub max_age: u64,
    pub include_subdomains: bool,
    pub preload: bool,
    /// Override a header set by the hosting platform.
    pub force: bool,
}

impl Default for Hsts {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age: DEFAULT_HSTS_MAX_AGE,
            include_subdomains: false,
            preload: false,
            force: true,
        }
    }
}

impl Hsts {
    fn value(&self) -> String {
        let mut value = format!("max-age={}", self.max_age);
        if self.include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if self.preload {
            value.push_str("; preload");
        }
        value
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DnsPrefetchControl {
    pub enabled: bool,
    pub allow: bool,
}

impl Default for DnsPrefetchControl {
    fn default() -> Self {
        Self {
            enabled: true,
            allow: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CspSettings {
    pub enabled: bool,
    /// Extra `script-src` sources next to `'self'`.
    pub trusted_script_sources: Vec<String>,
    /// Appended after `default-src` and `script-src`.
    pub extra_directives: Vec<Directive>,
}

impl Default for CspSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            trusted_script_sources: vec![DEFAULT_TRUSTED_SCRIPT_SOURCE.to_string()],
            extra_directives: Vec::new(),
        }
    }
}

impl CspSettings {
    fn policy(&self) -> ContentSecurityPolicy {
        let mut policy =
            ContentSecurityPolicy::self_with_trusted_scripts(self.trusted_script_sources.clone());
        policy.directives.extend(self.extra_directives.iter().cloned());
        policy
    }
}

/// Rules that stay off unless listed in `opt_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptIn {
    NoCache,
}

/// A raw rule from the settings file. The action is kept as a string so
/// an unknown action surfaces as [`PolicyError::UnknownAction`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomRule {
    pub name: String,
    pub action: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Process-wide header settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PolicySettings {
    pub hide_signature: HideSignature,
    pub frame_options: Toggle,
    pub xss_filter: Toggle,
    pub no_sniff: Toggle,
    pub download_options: Toggle,
    pub hsts: Hsts,
    pub dns_prefetch_control: DnsPrefetchControl,
    pub content_security_policy: CspSettings,
    pub opt_in: Vec<OptIn>,
    pub custom: Vec<CustomRule>,
    pub platform: PlatformSettings,
}

impl PolicySettings {
    pub fn from_toml_str(text: &str) -> Result<Self, PolicyError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`, or use the defaults when no file is configured.
    pub fn load(path: Option<&Path>) -> Result<Self, PolicyError> {
        let Some(path) = path else {
            tracing::info!("No header policy file configured, using defaults");
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded header policy file");
        Self::from_toml_str(&text)
    }

    pub fn is_opted_in(&self, rule: OptIn) -> bool {
        self.opt_in.contains(&rule)
    }

    /// Expand the settings into the ordered rule list.
    ///
    /// Disabled rules are kept with `enabled = false`.
    pub fn to_rules(&self) -> Result<Vec<HeaderRule>, PolicyError> {
        let mut rules = Vec::new();

        // Target whatever header the platform signs with.
        let signature = &self.hide_signature;
        let signature_header = self.platform.signature_header.as_str();
        let hide = if signature.decoy.is_empty() {
            HeaderRule::remove(signature_header)
        } else {
            HeaderRule::set(signature_header, signature.decoy.as_str())
        };
        rules.push(hide.enabled(signature.enabled));

        rules.push(
            HeaderRule::set("X-Frame-Options", "DENY").enabled(self.frame_options.enabled),
        );
        rules.push(
            HeaderRule::set("X-XSS-Protection", "1; mode=block").enabled(self.xss_filter.enabled),
        );
        rules.push(
            HeaderRule::set("X-Content-Type-Options", "nosniff").enabled(self.no_sniff.enabled),
        );
        rules.push(
            HeaderRule::set("X-Download-Options", "noopen")
                .enabled(self.download_options.enabled),
        );

        let hsts = &self.hsts;
        let transport = if hsts.force {
            HeaderRule::force_set("Strict-Transport-Security", hsts.value())
        } else {
            HeaderRule::set_if_absent("Strict-Transport-Security", hsts.value())
        };
        rules.push(transport.enabled(hsts.enabled));

        let dns = &self.dns_prefetch_control;
        rules.push(
            HeaderRule::set("X-DNS-Prefetch-Control", if dns.allow { "on" } else { "off" })
                .enabled(dns.enabled),
        );

        let csp = &self.content_security_policy;
        rules.push(
            HeaderRule::set("Content-Security-Policy", csp.policy()).enabled(csp.enabled),
        );

        let no_cache = self.is_opted_in(OptIn::NoCache);
        for (name, value) in NO_CACHE_HEADERS {
            rules.push(HeaderRule::set(*name, *value).enabled(no_cache));
        }

        for custom in &self.custom {
            rules.push(HeaderRule {
                name: custom.name.clone(),
                action: custom.action.parse()?,
                value: custom.value.clone().map(Into::into),
                enabled: custom.enabled,
            });
        }

        Ok(rules)
    }

    /// Build the policy and the hosting platform it runs under.
    ///
    /// When `platform.relinquish_forced` is set, FORCE_SET headers are
    /// released by the platform before the policy is returned.
    pub fn build(&self) -> Result<(HeaderPolicy, HostPlatform), PolicyError> {
        let mut platform = HostPlatform::from_settings(&self.platform)?;
        let rules = self.to_rules()?;
        let policy = if self.platform.relinquish_forced {
            HeaderPolicy::build_with_upstream(rules, &mut platform)?
        } else {
            HeaderPolicy::build(rules)?
        };
        Ok((policy, platform))
    }
}
