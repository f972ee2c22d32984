// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Header rule definitions.

use super::csp::ContentSecurityPolicy;
use super::PolicyError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// What a rule does to its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleAction {
    /// Overwrite any existing value.
    Set,
    /// Delete the header entirely.
    Remove,
    /// Set only if the header is missing or empty.
    SetIfAbsent,
    /// Overwrite, and ask the upstream layer to give up the header first.
    ForceSet,
}

impl RuleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleAction::Set => "SET",
            RuleAction::Remove => "REMOVE",
            RuleAction::SetIfAbsent => "SET_IF_ABSENT",
            RuleAction::ForceSet => "FORCE_SET",
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleAction {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SET" => Ok(RuleAction::Set),
            "REMOVE" => Ok(RuleAction::Remove),
            "SET_IF_ABSENT" => Ok(RuleAction::SetIfAbsent),
            "FORCE_SET" => Ok(RuleAction::ForceSet),
            _ => Err(PolicyError::UnknownAction(s.to_string())),
        }
    }
}

/// Value carried by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValue {
    Text(String),
    Csp(ContentSecurityPolicy),
}

impl RuleValue {
    /// Render to the string sent on the wire.
    pub fn render(&self) -> String {
        match self {
            RuleValue::Text(text) => text.clone(),
            RuleValue::Csp(policy) => policy.render(),
        }
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        RuleValue::Text(value)
    }
}

impl From<ContentSecurityPolicy> for RuleValue {
    fn from(value: ContentSecurityPolicy) -> Self {
        RuleValue::Csp(value)
    }
}

/// One header policy. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRule {
    pub name: String,
    pub action: RuleAction,
    pub value: Option<RuleValue>,
    pub enabled: bool,
}

impl HeaderRule {
    pub fn set(name: impl Into<String>, value: impl Into<RuleValue>) -> Self {
        Self::with_value(name, RuleAction::Set, value)
    }

    pub fn set_if_absent(name: impl Into<String>, value: impl Into<RuleValue>) -> Self {
        Self::with_value(name, RuleAction::SetIfAbsent, value)
    }

    pub fn force_set(name: impl Into<String>, value: impl Into<RuleValue>) -> Self {
        Self::with_value(name, RuleAction::ForceSet, value)
    }

    pub fn remove(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: RuleAction::Remove,
            value: None,
            enabled: true,
        }
    }

    fn with_value(
        name: impl Into<String>,
        action: RuleAction,
        value: impl Into<RuleValue>,
    ) -> Self {
        Self {
            name: name.into(),
            action,
            value: Some(value.into()),
            enabled: true,
        }
    }

    /// Toggle the rule without removing it from the list.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
