//! Alias rule store.
//!
//! # Data Flow
//! ```text
//! Rule compilation (at startup / reload):
//!     AliasConfig[] (scalar or list fields)
//!     → rule.rs (normalize into ordered lists, compile patterns)
//!     → Freeze as immutable RuleSet
//!
//! Per request (driven by resolve::Resolver):
//!     ParameterContext
//!     → matcher.rs (OR across a rule's matchers)
//!     → template.rs (expand candidates in order)
//! ```
//!
//! # Design Decisions
//! - Rules compiled once, immutable at runtime
//! - Deterministic: same input always selects the same rule
//! - First match wins (declaration order, regardless of specificity)

pub mod matcher;
pub mod rule;
pub mod template;

pub use matcher::{Matcher, Predicate};
pub use rule::{AliasRule, RuleError, RuleSet};
pub use template::{expand, Generator, ServeTemplate};
