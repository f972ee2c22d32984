// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content-Security-Policy value builder.
//!
//! This only assembles and sanity-checks directive lists. It does not try to
//! understand source expressions.

use super::PolicyError;
use serde::{Deserialize, Serialize};

/// Fetch directives that fall back to `default-src` when absent.
const FETCH_DIRECTIVES: &[&str] = &[
    "child-src",
    "connect-src",
    "font-src",
    "frame-src",
    "img-src",
    "manifest-src",
    "media-src",
    "object-src",
    "script-src",
    "style-src",
    "worker-src",
];

/// Directives with no fallback: absent means unrestricted.
const NON_FALLBACK_DIRECTIVES: &[&str] = &["base-uri", "form-action", "frame-ancestors"];

/// A single `name source source ...` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Directive {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl Directive {
    pub fn new<I, S>(name: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    fn render(&self) -> String {
        if self.sources.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.sources.join(" "))
        }
    }
}

/// Ordered list of CSP directives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentSecurityPolicy {
    pub directives: Vec<Directive>,
}

impl ContentSecurityPolicy {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self { directives }
    }

    /// `default-src 'self'; script-src 'self' trusted-cdn.com`
    pub fn self_with_trusted_scripts<I, S>(trusted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut script_sources = vec!["'self'".to_string()];
        script_sources.extend(trusted.into_iter().map(Into::into));
        Self::new(vec![
            Directive::new("default-src", ["'self'"]),
            Directive::new("script-src", script_sources),
        ])
    }

    pub fn render(&self) -> String {
        self.directives
            .iter()
            .map(Directive::render)
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.directives
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Reject lists that would render into a broken header.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.directives.is_empty() {
            return Err(invalid("(none)", "policy has no directives"));
        }

        for (i, directive) in self.directives.iter().enumerate() {
            let name = directive.name.as_str();
            if name.is_empty() {
                return Err(invalid(name, "empty directive name"));
            }
            if !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
            {
                return Err(invalid(name, "directive name has illegal characters"));
            }
            if self.directives[..i]
                .iter()
                .any(|d| d.name.eq_ignore_ascii_case(name))
            {
                return Err(invalid(name, "duplicate directive"));
            }
            for source in &directive.sources {
                if source.is_empty()
                    || source
                        .chars()
                        .any(|c| c == ';' || c == ',' || c.is_whitespace())
                {
                    return Err(invalid(name, &format!("bad source expression {source:?}")));
                }
            }
        }

        Ok(())
    }

    /// Directives the browser leaves unrestricted under this policy.
    ///
    /// Only `default-src` covers the fetch directives; everything in
    /// `NON_FALLBACK_DIRECTIVES` must be set explicitly.
    pub fn unrestricted_directives(&self) -> Vec<&'static str> {
        let mut open = Vec::new();
        if self.get("default-src").is_none() {
            open.extend(
                FETCH_DIRECTIVES
                    .iter()
                    .copied()
                    .filter(|name| self.get(name).is_none()),
            );
        }
        open.extend(
            NON_FALLBACK_DIRECTIVES
                .iter()
                .copied()
                .filter(|name| self.get(name).is_none()),
        );
        open
    }
}

fn invalid(directive: &str, reason: &str) -> PolicyError {
    PolicyError::InvalidDirective {
        directive: directive.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_policy() {
        let csp = ContentSecurityPolicy::self_with_trusted_scripts(["trusted-cdn.com"]);
        assert_eq!(
            csp.render(),
            "default-src 'self'; script-src 'self' trusted-cdn.com"
        );
        assert!(csp.validate().is_ok());
    }

    #[test]
    fn test_render_valueless_directive() {
        let csp = ContentSecurityPolicy::new(vec![
            Directive::new("default-src", ["'none'"]),
            Directive::new("upgrade-insecure-requests", Vec::<String>::new()),
        ]);
        assert_eq!(
            csp.render(),
            "default-src 'none'; upgrade-insecure-requests"
        );
    }

    #[test]
    fn test_validate_rejects_bad_lists() {
        assert!(ContentSecurityPolicy::default().validate().is_err());

        let dup = ContentSecurityPolicy::new(vec![
            Directive::new("script-src", ["'self'"]),
            Directive::new("Script-Src", ["cdn.example"]),
        ]);
        assert!(dup.validate().is_err());

        let injected = ContentSecurityPolicy::new(vec![Directive::new(
            "script-src",
            ["'self'; img-src *"],
        )]);
        assert!(injected.validate().is_err());

        let bad_name = ContentSecurityPolicy::new(vec![Directive::new("script src", ["'self'"])]);
        assert!(bad_name.validate().is_err());
    }

    #[test]
    fn test_known_gap_with_default_src() {
        let csp = ContentSecurityPolicy::self_with_trusted_scripts(["trusted-cdn.com"]);
        assert_eq!(
            csp.unrestricted_directives(),
            vec!["base-uri", "form-action", "frame-ancestors"]
        );
    }

    #[test]
    fn test_known_gap_without_default_src() {
        let csp = ContentSecurityPolicy::new(vec![
            Directive::new("script-src", ["'self'"]),
            Directive::new("frame-ancestors", ["'none'"]),
        ]);
        let open = csp.unrestricted_directives();
        assert!(open.contains(&"img-src"));
        assert!(open.contains(&"base-uri"));
        assert!(!open.contains(&"script-src"));
        assert!(!open.contains(&"frame-ancestors"));
    }
}
