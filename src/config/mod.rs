//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → alias::RuleSet + resolve::Resolver built from it
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → overrides.rs re-applies command-line settings
//!     → validation.rs validates
//!     → new Resolver swapped in atomically by the HTTP server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Scalar-or-list fields are accepted as written and normalized later
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use overrides::ConfigOverrides;
pub use schema::{
    AliasConfig, ListenerConfig, MatchConfig, ObservabilityConfig, OneOrMany, ServerConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
