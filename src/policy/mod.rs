// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response header policy.
//!
//! A [`HeaderPolicy`] is an ordered list of header rules validated once at
//! startup. Applying it to a response only touches headers and never fails.

pub mod csp;
pub mod pipeline;
pub mod rule;
pub mod settings;
pub mod upstream;

pub use csp::{ContentSecurityPolicy, Directive};
pub use pipeline::{apply, CompiledRule, HeaderPolicy};
pub use rule::{HeaderRule, RuleAction, RuleValue};
pub use settings::PolicySettings;
pub use upstream::UpstreamControl;

use std::path::PathBuf;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Header rule has an empty name")]
    EmptyHeaderName,

    #[error("Invalid header name: {0:?}")]
    InvalidHeaderName(String),

    #[error("Invalid value for header {name}: {value:?}")]
    InvalidHeaderValue { name: String, value: String },

    #[error("{action} rule for {name} requires a value")]
    MissingValue { name: String, action: RuleAction },

    #[error("Unknown rule action: {0:?}")]
    UnknownAction(String),

    #[error("Invalid CSP directive {directive:?}: {reason}")]
    InvalidDirective { directive: String, reason: String },

    #[error("Failed to read policy file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid policy file: {0}")]
    Parse(#[from] toml::de::Error),
}
