//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the static file server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory the server is rooted at.
    pub root: PathBuf,

    /// Render an HTML listing for directories without an `index.html`.
    pub directory_listing: bool,

    /// Alias rules, checked in declaration order.
    /// Accepts a single `[alias]` table or an `[[alias]]` array.
    #[serde(alias = "aliases")]
    pub alias: OneOrMany<AliasConfig>,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            directory_listing: false,
            alias: OneOrMany::default(),
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// A config value that may be written either as a scalar or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Materialize as an ordered list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    /// Borrow as a slice, preserving order.
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

/// One alias rule as written in the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AliasConfig {
    /// Match conditions (OR semantics). Empty matches every request.
    #[serde(rename = "match")]
    pub matches: OneOrMany<MatchConfig>,

    /// Candidate serve-path templates. Empty serves the requested path.
    pub serve: OneOrMany<String>,

    /// Accept a candidate without checking that it exists.
    pub force: bool,

    /// Accept a candidate outside the server root.
    #[serde(alias = "allowOutside")]
    pub allow_outside: bool,
}

/// A match condition as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MatchConfig {
    /// `"value"` or `"key=value"`; the key defaults to `reqPath`.
    Literal(String),
    /// `{ regex = "^/api/" }`, tested against the request path.
    Pattern { regex: String },
    /// `{ key = "host", value = "example.com" }`.
    Keyed { key: String, value: String },
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Deadline for resolving a path, existence checks included, in seconds.
    pub resolve_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            resolve_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_alias_table() {
        let config: ServerConfig = toml::from_str(
            r#"
            root = "/srv"

            [alias]
            match = "reqPath=/secret"
            serve = "/etc/passwd"
            "#,
        )
        .unwrap();

        let rules = config.alias.into_vec();
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0].matches.as_slice(),
            &[MatchConfig::Literal("reqPath=/secret".into())]
        );
        assert_eq!(rules[0].serve.as_slice(), &["/etc/passwd".to_string()]);
        assert!(!rules[0].force);
    }

    #[test]
    fn test_alias_array_with_mixed_matchers() {
        let config: ServerConfig = toml::from_str(
            r#"
            [[alias]]
            match = ["/a", { regex = "^/api/" }, { key = "host", value = "example.com" }]
            serve = ["one", "two"]
            force = true
            allowOutside = true

            [[alias]]
            "#,
        )
        .unwrap();

        let rules = config.alias.as_slice();
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0].matches.as_slice(),
            &[
                MatchConfig::Literal("/a".into()),
                MatchConfig::Pattern { regex: "^/api/".into() },
                MatchConfig::Keyed {
                    key: "host".into(),
                    value: "example.com".into()
                },
            ]
        );
        assert!(rules[0].force);
        assert!(rules[0].allow_outside);
        assert!(rules[1].matches.is_empty());
        assert!(rules[1].serve.is_empty());
    }

    #[test]
    fn test_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert!(config.alias.is_empty());
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.resolve_secs, 5);
        assert!(!config.directory_listing);
    }
}
