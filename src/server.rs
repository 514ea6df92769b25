//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the proxy
//! once it is ready, plus request counters), [`build_router`] for
//! constructing the catch-all Axum router with middleware layers,
//! [`build_http_client`] for the connection-pooled hyper client, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::body::Body;
use axum::Router;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::ProxyError;
use crate::proxy::{self, ProxyServer};

#[derive(Debug)]
pub struct Stats {
    pub forwarded: AtomicU64,
    pub failed: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }
}

pub type HttpClient = Client<HttpConnector, Body>;

/// Shared state behind every request.
///
/// Starts without a proxy. [`AppState::initialize`] installs one exactly
/// once; until then every request is answered with 500.
pub struct AppState {
    proxy: OnceLock<ProxyServer>,
    pub stats: Stats,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            proxy: OnceLock::new(),
            stats: Stats::new(),
        }
    }

    pub fn initialize(&self, proxy: ProxyServer) -> Result<(), ProxyError> {
        self.proxy
            .set(proxy)
            .map_err(|_| ProxyError::AlreadyInitialized)
    }

    pub fn proxy(&self) -> Result<&ProxyServer, ProxyError> {
        self.proxy.get().ok_or(ProxyError::NotInitialized)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.proxy.get().is_some()
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .pool_timer(TokioTimer::new())
        // one attempt per forwarded request
        .retry_canceled_requests(false)
        .build_http()
}

pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .fallback(proxy::forward_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::forward::ForwardingEngine;
    use crate::proxy::registry::{BackendRegistry, ServiceDescriptor};

    fn proxy() -> ProxyServer {
        let registry =
            BackendRegistry::new(vec![ServiceDescriptor::new("llm", "localhost:8001")]).unwrap();
        ProxyServer::new(registry, ForwardingEngine::new(build_http_client()))
    }

    #[tokio::test]
    async fn starts_uninitialized() {
        let state = AppState::new();
        assert!(!state.is_ready());
        assert!(matches!(state.proxy(), Err(ProxyError::NotInitialized)));
    }

    #[tokio::test]
    async fn initializes_exactly_once() {
        let state = AppState::new();
        state.initialize(proxy()).unwrap();
        assert!(state.is_ready());
        assert_eq!(state.proxy().unwrap().registry().first().name(), "llm");

        let err = state.initialize(proxy()).unwrap_err();
        assert!(matches!(err, ProxyError::AlreadyInitialized));
    }
}
