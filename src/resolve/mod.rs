//! Request path resolution.
//!
//! # Data Flow
//! ```text
//! Decoded request path + headers
//!     → context.rs (ParameterContext: absPath, reqPath, basename, headers, ...)
//!     → resolver.rs (rules in order, candidates in order, existence checks)
//!     → containment.rs (root prefix check unless allow_outside)
//!     → Resolution::ServePath(path) | Resolution::Forbidden
//! ```
//!
//! # Design Decisions
//! - The resolver never errors; not-found is the file layer's call
//! - Path handling is lexical (path.rs); traversal is caught by containment
//! - Decisions are reported through an injected logger, no-op by default

pub mod containment;
pub mod context;
pub mod logger;
pub mod path;
pub mod resolver;

pub use containment::Containment;
pub use context::ParameterContext;
pub use logger::{NoopLogger, ResolveEvent, ResolveLogger, TracingLogger};
pub use path::{decode_request_path, PathError};
pub use resolver::{Resolution, Resolver};
