//! Resolution event logging.
//!
//! The resolver reports its decisions through an injected [`ResolveLogger`].
//! The default is [`NoopLogger`]; the server installs [`TracingLogger`].

use std::path::Path;

/// A decision point reached while resolving one request.
#[derive(Debug, Clone, Copy)]
pub enum ResolveEvent<'a> {
    /// A request entered alias resolution.
    Requested { req_path: &'a str, abs_path: &'a Path },
    /// A rule produced a viable serve candidate.
    Selected {
        req_path: &'a str,
        serve_path: &'a Path,
        rule: usize,
        /// `None` for a rule without match conditions.
        matcher: Option<usize>,
        template: usize,
    },
}

pub trait ResolveLogger: Send + Sync {
    fn log(&self, event: &ResolveEvent<'_>);
}

impl<F> ResolveLogger for F
where
    F: Fn(&ResolveEvent<'_>) + Send + Sync,
{
    fn log(&self, event: &ResolveEvent<'_>) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl ResolveLogger for NoopLogger {
    fn log(&self, _event: &ResolveEvent<'_>) {}
}

/// Emits events as structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ResolveLogger for TracingLogger {
    fn log(&self, event: &ResolveEvent<'_>) {
        match *event {
            ResolveEvent::Requested { req_path, abs_path } => {
                tracing::info!(req_path, abs_path = %abs_path.display(), "Requested");
            }
            ResolveEvent::Selected {
                req_path,
                serve_path,
                rule,
                matcher,
                template,
            } => {
                tracing::info!(
                    req_path,
                    serve_path = %serve_path.display(),
                    alias = rule,
                    matcher = ?matcher,
                    serve = template,
                    "For serve"
                );
            }
        }
    }
}
