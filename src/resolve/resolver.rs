//! Alias resolution.
//!
//! # Responsibilities
//! - Evaluate rules in declaration order against a request's context
//! - Pick the first viable serve candidate of the first matching rule
//! - Apply the containment check unless the winning rule allows escaping
//!
//! # Design Decisions
//! - Pure, single-pass decision: no retries, no errors
//! - Existence checks are blocking; callers dispatch `resolve` to a worker
//! - Not-found and node-type outcomes belong to the caller's stat

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderMap;

use crate::alias::{RuleError, RuleSet};
use crate::config::ServerConfig;
use crate::resolve::containment::Containment;
use crate::resolve::context::ParameterContext;
use crate::resolve::logger::{NoopLogger, ResolveEvent, ResolveLogger};
use crate::resolve::path::{normalize, resolve_request};

/// Outcome of resolving one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Hand this absolute path to the file-serving layer.
    ServePath(PathBuf),
    /// The path lies outside the root and no rule allowed it.
    Forbidden,
}

/// Winning candidate of a rule.
struct Selection {
    path: PathBuf,
    allow_outside: bool,
}

/// Maps request paths to filesystem paths through an ordered rule set.
pub struct Resolver {
    root: PathBuf,
    containment: Containment,
    rules: RuleSet,
    logger: Arc<dyn ResolveLogger>,
}

impl Resolver {
    /// Create a resolver rooted at `root`. A relative root is made absolute
    /// against the current directory.
    pub fn new(root: impl AsRef<Path>, rules: RuleSet) -> Self {
        let root = root.as_ref();
        let root = std::path::absolute(root)
            .map(|abs| normalize(&abs))
            .unwrap_or_else(|_| normalize(root));

        Self {
            containment: Containment::new(&root),
            root,
            rules,
            logger: Arc::new(NoopLogger),
        }
    }

    /// Build the root and rule set from configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self, RuleError> {
        let rules = RuleSet::from_config(config.alias.as_slice())?;
        Ok(Self::new(&config.root, rules))
    }

    pub fn with_logger(mut self, logger: Arc<dyn ResolveLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Override platform case folding of the containment check.
    pub fn with_case_insensitive_root(mut self, case_insensitive: bool) -> Self {
        self.containment = Containment::with_case_folding(&self.root, case_insensitive);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Decide which path, if any, serves `req_path`.
    ///
    /// `req_path` must already be percent-decoded. Existence checks hit the
    /// filesystem synchronously.
    pub fn resolve(&self, req_path: &str, headers: &HeaderMap) -> Resolution {
        if self.rules.is_empty() {
            return self.contain(resolve_request(&self.root, req_path), false);
        }

        let ctx = ParameterContext::build(&self.root, req_path, headers);
        self.emit(ResolveEvent::Requested {
            req_path: ctx.req_path(),
            abs_path: ctx.abs_path(),
        });

        match self.select(&ctx) {
            Some(selection) => self.contain(selection.path, selection.allow_outside),
            None => self.contain(ctx.abs_path().to_path_buf(), false),
        }
    }

    fn select(&self, ctx: &ParameterContext) -> Option<Selection> {
        for (rule_index, rule) in self.rules.iter().enumerate() {
            let matcher = if rule.matchers().is_empty() {
                None
            } else {
                match rule.matchers().iter().position(|m| m.matches(ctx)) {
                    Some(i) => Some(i),
                    None => continue,
                }
            };

            for (template_index, template) in rule.serve().iter().enumerate() {
                let path = template.candidate(ctx, &self.root);
                if rule.force() || path.exists() {
                    self.emit(ResolveEvent::Selected {
                        req_path: ctx.req_path(),
                        serve_path: &path,
                        rule: rule_index,
                        matcher,
                        template: template_index,
                    });
                    return Some(Selection {
                        path,
                        allow_outside: rule.allow_outside(),
                    });
                }
            }
        }
        None
    }

    fn contain(&self, path: PathBuf, allow_outside: bool) -> Resolution {
        if allow_outside || self.containment.contains(&path) {
            Resolution::ServePath(path)
        } else {
            Resolution::Forbidden
        }
    }

    fn emit(&self, event: ResolveEvent<'_>) {
        // A failing logger must not abort resolution.
        let logger = &self.logger;
        if panic::catch_unwind(AssertUnwindSafe(|| logger.log(&event))).is_err() {
            tracing::warn!("Resolve logger panicked, event dropped");
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("root", &self.root)
            .field("containment", &self.containment)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
