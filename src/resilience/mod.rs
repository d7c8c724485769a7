//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request needs a resolution:
//!     → timeouts.rs (run on blocking pool, enforce resolve deadline)
//!     → On timeout or panic: caller answers 500
//! ```
//!
//! # Design Decisions
//! - Every blocking filesystem call made on behalf of a request has a deadline
//! - No retries: resolution is a pure, idempotent decision

pub mod timeouts;

pub use timeouts::{blocking_with_timeout, BlockingError};
