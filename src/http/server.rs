//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single fallback handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Decode the request path and dispatch resolution to the blocking pool
//! - Hand the resolved path to the file layer, or answer 400/403/500
//! - Swap in a new resolver when the configuration changes

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::alias::RuleError;
use crate::config::ServerConfig;
use crate::http::files;
use crate::lifecycle::wait_for;
use crate::observability::metrics;
use crate::resilience::blocking_with_timeout;
use crate::resolve::{decode_request_path, Resolution, Resolver, TracingLogger};

/// Error constructing the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid alias rules: {0}")]
    Rules(#[from] RuleError),
}

/// Everything a request needs that can change on config reload.
#[derive(Debug)]
pub struct Site {
    pub resolver: Resolver,
    pub directory_listing: bool,
}

impl Site {
    pub fn from_config(config: &ServerConfig) -> Result<Self, RuleError> {
        let resolver = Resolver::from_config(config)?.with_logger(Arc::new(TracingLogger));
        Ok(Self {
            resolver,
            directory_listing: config.directory_listing,
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<ArcSwap<Site>>,
    pub resolve_timeout: Duration,
}

/// HTTP server for the static site.
pub struct HttpServer {
    router: Router,
    site: Arc<ArcSwap<Site>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let site = Site::from_config(&config)?;
        tracing::info!(
            root = %site.resolver.root().display(),
            rules = site.resolver.rules().len(),
            "Alias rules loaded"
        );

        let site = Arc::new(ArcSwap::from_pointee(site));
        let state = AppState {
            site: site.clone(),
            resolve_timeout: Duration::from_secs(config.timeouts.resolve_secs),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, site })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(serve_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Every config received on `config_updates` replaces the resolver;
    /// in-flight requests finish with the one they started with.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let site = self.site.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match Site::from_config(&config) {
                    Ok(new_site) => {
                        tracing::info!(
                            root = %new_site.resolver.root().display(),
                            rules = new_site.resolver.rules().len(),
                            "Alias rules reloaded"
                        );
                        site.store(Arc::new(new_site));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected reloaded config, keeping current rules");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request path through the alias rules and serve the result.
async fn serve_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();

    let req_path = match decode_request_path(request.uri().path()) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), error = %e, "Undecodable request path");
            metrics::record_request(400, start_time);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let site = state.site.load_full();
    let resolution = {
        let site = site.clone();
        let req_path = req_path.clone();
        let headers = request.headers().clone();
        blocking_with_timeout(state.resolve_timeout, move || {
            site.resolver.resolve(&req_path, &headers)
        })
        .await
    };

    let response = match resolution {
        Ok(Resolution::ServePath(path)) => {
            metrics::record_resolution("serve");
            tracing::debug!(req_path = %req_path, serve_path = %path.display(), "Serving");
            files::serve_path(&path, &req_path, site.directory_listing, request).await
        }
        Ok(Resolution::Forbidden) => {
            metrics::record_resolution("forbidden");
            tracing::warn!(req_path = %req_path, "Resolved path outside root");
            StatusCode::FORBIDDEN.into_response()
        }
        Err(e) => {
            metrics::record_resolution("error");
            tracing::error!(req_path = %req_path, error = %e, "Resolution failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), start_time);
    response
}
