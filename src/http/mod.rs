//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → server.rs handler (decode path, resolve on blocking pool)
//!     → files.rs (stat: file → stream, dir → index/listing, else 404/400)
//!     → Send to client
//! ```

pub mod files;
pub mod server;

pub use files::ServeTarget;
pub use server::{HttpServer, ServerError, Site};
