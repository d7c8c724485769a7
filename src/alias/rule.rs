//! Alias rules and the ordered rule set.
//!
//! # Responsibilities
//! - Normalize config entries (scalar or list) into ordered lists once, at load time
//! - Default an empty serve list to the identity template
//! - Preserve declaration order
//!
//! # Design Decisions
//! - Immutable after construction (shared across requests without locks)
//! - Only an uncompilable pattern is rejected; anything else is accepted as written

use thiserror::Error;

use crate::alias::matcher::Matcher;
use crate::alias::template::ServeTemplate;
use crate::config::{AliasConfig, MatchConfig};

/// Error building a rule set from configuration.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("alias[{rule}] match[{matcher}]: invalid pattern: {source}")]
    InvalidPattern {
        rule: usize,
        matcher: usize,
        #[source]
        source: regex::Error,
    },
}

/// A normalized alias rule.
#[derive(Debug, Clone)]
pub struct AliasRule {
    matchers: Vec<Matcher>,
    serve: Vec<ServeTemplate>,
    force: bool,
    allow_outside: bool,
}

impl AliasRule {
    /// Create a rule. An empty `matchers` list matches every request; an
    /// empty `serve` list is replaced by `[ServeTemplate::Identity]`.
    pub fn new(matchers: Vec<Matcher>, serve: Vec<ServeTemplate>) -> Self {
        let serve = if serve.is_empty() {
            vec![ServeTemplate::Identity]
        } else {
            serve
        };
        Self {
            matchers,
            serve,
            force: false,
            allow_outside: false,
        }
    }

    /// Accept candidates without checking that they exist.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Accept candidates outside the server root.
    pub fn with_allow_outside(mut self, allow_outside: bool) -> Self {
        self.allow_outside = allow_outside;
        self
    }

    /// Build a rule from its config entry. `index` is only used for errors.
    pub fn from_config(index: usize, config: &AliasConfig) -> Result<Self, RuleError> {
        let matchers = config
            .matches
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                MatchConfig::Literal(text) => Ok(Matcher::literal(text)),
                MatchConfig::Keyed { key, value } => Ok(Matcher::keyed(key, value)),
                MatchConfig::Pattern { regex } => {
                    Matcher::pattern(regex).map_err(|source| RuleError::InvalidPattern {
                        rule: index,
                        matcher: i,
                        source,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let serve = config
            .serve
            .as_slice()
            .iter()
            .map(ServeTemplate::template)
            .collect();

        Ok(Self::new(matchers, serve)
            .with_force(config.force)
            .with_allow_outside(config.allow_outside))
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Never empty.
    pub fn serve(&self) -> &[ServeTemplate] {
        &self.serve
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn allow_outside(&self) -> bool {
        self.allow_outside
    }
}

/// Ordered alias rules, first match wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<AliasRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<AliasRule>) -> Self {
        Self { rules }
    }

    /// Build the rule set from config entries, preserving their order.
    pub fn from_config(configs: &[AliasConfig]) -> Result<Self, RuleError> {
        let rules = configs
            .iter()
            .enumerate()
            .map(|(i, config)| AliasRule::from_config(i, config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AliasRule> {
        self.rules.iter()
    }
}

impl FromIterator<AliasRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = AliasRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn rules_from(toml_text: &str) -> RuleSet {
        let config: ServerConfig = toml::from_str(toml_text).unwrap();
        RuleSet::from_config(config.alias.as_slice()).unwrap()
    }

    #[test]
    fn test_scalar_fields_become_lists() {
        let rules = rules_from(
            r#"
            [alias]
            match = "/a"
            serve = "b"
            force = true
            "#,
        );

        assert_eq!(rules.len(), 1);
        let rule = rules.iter().next().unwrap();
        assert_eq!(rule.matchers().len(), 1);
        assert_eq!(rule.serve().len(), 1);
        assert!(matches!(&rule.serve()[0], ServeTemplate::Template(t) if t == "b"));
        assert!(rule.force());
        assert!(!rule.allow_outside());
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let rules = rules_from("[[alias]]\nallow_outside = true\n");

        let rule = rules.iter().next().unwrap();
        assert!(rule.matchers().is_empty());
        assert!(matches!(rule.serve(), [ServeTemplate::Identity]));
        assert!(rule.allow_outside());
    }

    #[test]
    fn test_order_is_preserved() {
        let rules = rules_from(
            r#"
            [[alias]]
            serve = "first"
            [[alias]]
            serve = ["second", "third"]
            "#,
        );

        let serves: Vec<_> = rules
            .iter()
            .flat_map(|r| r.serve().iter())
            .map(|s| match s {
                ServeTemplate::Template(t) => t.clone(),
                other => panic!("unexpected template: {other:?}"),
            })
            .collect();
        assert_eq!(serves, ["first", "second", "third"]);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let config = AliasConfig {
            matches: vec![MatchConfig::Pattern { regex: "(".into() }].into(),
            ..AliasConfig::default()
        };

        let err = RuleSet::from_config(&[AliasConfig::default(), config]).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { rule: 1, matcher: 0, .. }));
    }

    #[test]
    fn test_programmatic_rule_defaults_to_identity() {
        let rule = AliasRule::new(vec![Matcher::literal("/x")], Vec::new());
        assert!(matches!(rule.serve(), [ServeTemplate::Identity]));
    }
}
