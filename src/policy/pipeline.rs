// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Validated header policy and its per-response application.

use super::rule::{HeaderRule, RuleAction, RuleValue};
use super::upstream::UpstreamControl;
use super::PolicyError;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

#[derive(Debug, Clone)]
enum Op {
    Set(HeaderValue),
    SetIfAbsent(HeaderValue),
    Remove,
}

/// A rule after validation: header name and value already parsed.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    name: HeaderName,
    action: RuleAction,
    op: Op,
}

impl CompiledRule {
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    pub fn action(&self) -> RuleAction {
        self.action
    }

    pub fn value(&self) -> Option<&HeaderValue> {
        match &self.op {
            Op::Set(value) | Op::SetIfAbsent(value) => Some(value),
            Op::Remove => None,
        }
    }

    fn apply(&self, headers: &mut HeaderMap) {
        match &self.op {
            Op::Set(value) => {
                headers.insert(self.name.clone(), value.clone());
            }
            Op::SetIfAbsent(value) => {
                let present = headers
                    .get_all(&self.name)
                    .iter()
                    .any(|existing| !existing.is_empty());
                if !present {
                    headers.insert(self.name.clone(), value.clone());
                }
            }
            Op::Remove => {
                headers.remove(&self.name);
            }
        }
    }
}

/// The process-wide header policy.
///
/// Built once at startup and shared read-only between request handlers.
#[derive(Debug, Clone, Default)]
pub struct HeaderPolicy {
    rules: Vec<CompiledRule>,
}

impl HeaderPolicy {
    /// Validate and compile `rules` without touching any upstream layer.
    ///
    /// Every rule is checked, including disabled ones, so a typo in a
    /// switched-off rule still stops startup.
    pub fn build<I>(rules: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = HeaderRule>,
    {
        let mut compiled = Vec::new();
        for rule in rules {
            let enabled = rule.enabled;
            let rule = compile(rule)?;
            if enabled {
                tracing::debug!(
                    header = %rule.name,
                    action = %rule.action,
                    "Header rule enabled"
                );
                compiled.push(rule);
            } else {
                tracing::debug!(header = %rule.name, "Header rule disabled");
            }
        }
        Ok(Self { rules: compiled })
    }

    /// Build, then make the upstream layer release every FORCE_SET header.
    ///
    /// Without the release the upstream rewrites the header after the
    /// pipeline runs and the forced value never reaches the client.
    pub fn build_with_upstream<I, U>(rules: I, upstream: &mut U) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = HeaderRule>,
        U: UpstreamControl + ?Sized,
    {
        let policy = Self::build(rules)?;
        for rule in policy
            .rules
            .iter()
            .filter(|r| r.action == RuleAction::ForceSet)
        {
            if upstream.relinquish(&rule.name) {
                tracing::info!(header = %rule.name, "Upstream released header control");
            }
        }
        Ok(policy)
    }

    /// Run every rule, in order, against `headers`.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for rule in &self.rules {
            rule.apply(headers);
        }
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Value-returning form of [`HeaderPolicy::apply`].
pub fn apply(policy: &HeaderPolicy, mut headers: HeaderMap) -> HeaderMap {
    policy.apply(&mut headers);
    headers
}

fn compile(rule: HeaderRule) -> Result<CompiledRule, PolicyError> {
    if rule.name.trim().is_empty() {
        return Err(PolicyError::EmptyHeaderName);
    }

    let name = HeaderName::from_bytes(rule.name.as_bytes())
        .map_err(|_| PolicyError::InvalidHeaderName(rule.name.clone()))?;

    let op = match (rule.action, rule.value) {
        (RuleAction::Remove, _) => Op::Remove,
        (action, Some(value)) => {
            if let RuleValue::Csp(csp) = &value {
                csp.validate()?;
                let open = csp.unrestricted_directives();
                if !open.is_empty() {
                    tracing::warn!(
                        header = %name,
                        unrestricted = ?open,
                        "Content security policy leaves directives unrestricted"
                    );
                }
            }
            let rendered = value.render();
            let value = HeaderValue::from_str(&rendered).map_err(|_| {
                PolicyError::InvalidHeaderValue {
                    name: rule.name.clone(),
                    value: rendered.clone(),
                }
            })?;
            if action == RuleAction::SetIfAbsent {
                Op::SetIfAbsent(value)
            } else {
                Op::Set(value)
            }
        }
        (action, None) => {
            return Err(PolicyError::MissingValue {
                name: rule.name,
                action,
            })
        }
    };

    Ok(CompiledRule {
        name,
        action: rule.action,
        op,
    })
}
