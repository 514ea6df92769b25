//! Core HTTP request forwarding.
//!
//! [`ProxyServer`] bundles the immutable [`BackendRegistry`], the
//! active [`RouteSelector`], and the [`ForwardingEngine`]. The
//! [`forward_handler`] function is the Axum fallback that receives
//! every request, whatever its method or path, resolves a backend, and
//! relays the backend's streamed response or a classified failure.

pub mod forward;
pub mod registry;
pub mod selector;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use crate::config::model::Config;
use crate::error::ProxyError;
use crate::server::{AppState, HttpClient};
use forward::{error_response, ForwardRequest, ForwardingEngine};
use registry::BackendRegistry;
use selector::{FirstService, RouteSelector};

pub struct ProxyServer {
    registry: Arc<BackendRegistry>,
    selector: Box<dyn RouteSelector>,
    engine: ForwardingEngine,
}

impl ProxyServer {
    /// Uses the [`FirstService`] selection policy.
    #[must_use]
    pub fn new(registry: BackendRegistry, engine: ForwardingEngine) -> Self {
        let registry = Arc::new(registry);
        let selector = Box::new(FirstService::new(Arc::clone(&registry)));
        Self {
            registry,
            selector,
            engine,
        }
    }

    pub fn from_config(config: &Config, client: HttpClient) -> Result<Self, ProxyError> {
        let registry = BackendRegistry::from_config(config)?;
        Ok(Self::new(registry, ForwardingEngine::new(client)))
    }

    #[must_use]
    pub fn with_selector(mut self, selector: Box<dyn RouteSelector>) -> Self {
        self.selector = selector;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    #[must_use]
    pub fn selector(&self) -> &dyn RouteSelector {
        &*self.selector
    }

    #[must_use]
    pub const fn engine(&self) -> &ForwardingEngine {
        &self.engine
    }
}

pub async fn forward_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("forward", request_id = %request_id);
    relay(&state, request).instrument(span).await
}

async fn relay(state: &AppState, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let proxy = match state.proxy() {
        Ok(proxy) => proxy,
        Err(e) => {
            tracing::error!(method = %method, path = %path, error = %e, "rejecting request");
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let Some(target) = proxy.selector().select(&path) else {
        tracing::warn!(
            method = %method,
            path = %path,
            selector = proxy.selector().name(),
            "no route matched"
        );
        state.stats.failed.fetch_add(1, Ordering::Relaxed);
        return error_response(StatusCode::NOT_FOUND, "No route matched");
    };

    tracing::info!(
        method = %method,
        path = %path,
        service = target.name(),
        "request received"
    );

    let start = Instant::now();
    match proxy
        .engine()
        .forward(ForwardRequest::from(request), target)
        .await
    {
        Ok(response) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                service = target.name(),
                status = response.status().as_u16(),
                latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "backend responded"
            );
            response
        }
        Err(failure) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                service = target.name(),
                status = failure.status().as_u16(),
                error = %failure.detail(),
                latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "forward failed"
            );
            failure.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_http_client;
    use registry::ServiceDescriptor;

    struct NoRoute;

    impl RouteSelector for NoRoute {
        fn name(&self) -> &'static str {
            "none"
        }

        fn select(&self, _path: &str) -> Option<&registry::ServiceDescriptor> {
            None
        }
    }

    fn proxy() -> ProxyServer {
        let registry = BackendRegistry::new(vec![
            ServiceDescriptor::new("service1", "localhost:8001"),
            ServiceDescriptor::new("service2", "localhost:8002"),
        ])
        .unwrap();
        ProxyServer::new(registry, ForwardingEngine::new(build_http_client()))
    }

    #[tokio::test]
    async fn defaults_to_first_service_policy() {
        let proxy = proxy();
        assert_eq!(proxy.selector().name(), "first-service");
        assert_eq!(proxy.selector().select("/x").unwrap().name(), "service1");
        assert_eq!(proxy.registry().len(), 2);
        assert_eq!(proxy.engine().timeout(), forward::FORWARD_TIMEOUT);
    }

    #[tokio::test]
    async fn no_route_yields_404() {
        let state = AppState::new();
        state
            .initialize(proxy().with_selector(Box::new(NoRoute)))
            .unwrap();
        let request = axum::http::Request::builder()
            .uri("/anything")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = relay(&state, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.stats.failed.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn uninitialized_state_yields_500() {
        let state = AppState::new();
        let request = axum::http::Request::builder()
            .uri("/test")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = relay(&state, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.stats.forwarded.load(Ordering::Relaxed), 0);
    }
}
