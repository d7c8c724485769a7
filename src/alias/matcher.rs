//! Alias match conditions.
//!
//! # Responsibilities
//! - Decide whether a rule applies to a request's parameter context
//! - Parse the `"key=value"` literal shorthand
//!
//! # Design Decisions
//! - Closed set of variants (literal, pattern, predicate) instead of trait objects
//! - Literal comparison is exact and case-sensitive
//! - Patterns are tested against `reqPath` only

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::resolve::context::{ParameterContext, REQ_PATH};

/// Caller-supplied match function.
pub type Predicate = Arc<dyn Fn(&ParameterContext) -> bool + Send + Sync>;

/// A single match condition of an alias rule.
#[derive(Clone)]
pub enum Matcher {
    /// Matches when the named parameter equals `value` exactly.
    Literal { key: String, value: String },
    /// Matches when the regex finds a match in `reqPath`.
    Pattern(Regex),
    /// Matches when the function returns true.
    Predicate(Predicate),
}

impl Matcher {
    /// Parse the `"key=value"` shorthand. Everything up to the first `=` is
    /// the key; without a `=` (or with an empty key) the key is `reqPath`.
    pub fn literal(text: &str) -> Self {
        let (key, value) = match text.split_once('=') {
            Some((key, value)) if !key.is_empty() => (key, value),
            Some((_, value)) => (REQ_PATH, value),
            None => (REQ_PATH, text),
        };
        Self::keyed(key, value)
    }

    /// Match a named parameter against an exact value.
    pub fn keyed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Matcher::Literal {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Compile a regex tested against `reqPath`.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Matcher::Pattern(Regex::new(pattern)?))
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&ParameterContext) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Arc::new(f))
    }

    /// Returns true if the request described by `ctx` satisfies this condition.
    pub fn matches(&self, ctx: &ParameterContext) -> bool {
        match self {
            Matcher::Literal { key, value } => ctx.get(key) == Some(value.as_str()),
            Matcher::Pattern(regex) => regex.is_match(ctx.req_path()),
            Matcher::Predicate(f) => f(ctx),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Literal { key, value } => f
                .debug_struct("Literal")
                .field("key", key)
                .field("value", value)
                .finish(),
            Matcher::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}
