//! Static file server with ordered alias rules.
//!
//! A request path is run through a list of alias rules before falling back
//! to the literal file under the server root. Rules match on the path, on
//! derived parameters or on request headers, and rewrite the request to
//! candidate paths built from `<% name %>` templates. Every result is checked
//! against the root unless the winning rule explicitly allows escaping it.

pub mod alias;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod resolve;

pub use alias::{AliasRule, Matcher, RuleSet, ServeTemplate};
pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resolve::{Resolution, Resolver};
