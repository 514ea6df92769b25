//! Shared helpers for integration tests: backends, proxy, and client.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use inference_proxy::proxy::forward::ForwardingEngine;
use inference_proxy::proxy::registry::{BackendRegistry, ServiceDescriptor};
use inference_proxy::proxy::ProxyServer;
use inference_proxy::server::{self, AppState};

pub const TEST_MAX_BODY: usize = 1_048_576;

/// Serve `router` on an ephemeral port.
pub async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Serve the proxy router for `state` on an ephemeral port.
pub async fn spawn_proxy(state: Arc<AppState>) -> SocketAddr {
    spawn_proxy_with_limit(state, TEST_MAX_BODY).await
}

pub async fn spawn_proxy_with_limit(state: Arc<AppState>, max_body: usize) -> SocketAddr {
    spawn_backend(server::build_router(state, max_body)).await
}

pub fn proxy_server(services: &[(&str, SocketAddr)], timeout: Duration) -> ProxyServer {
    let registry = BackendRegistry::new(
        services
            .iter()
            .map(|(name, addr)| ServiceDescriptor::new(*name, addr.to_string()))
            .collect(),
    )
    .unwrap();
    let engine = ForwardingEngine::new(server::build_http_client()).with_timeout(timeout);
    ProxyServer::new(registry, engine)
}

/// A ready proxy in front of `services`, served on an ephemeral port.
pub async fn ready_proxy(services: &[(&str, SocketAddr)], timeout: Duration) -> SocketAddr {
    let state = Arc::new(AppState::new());
    state.initialize(proxy_server(services, timeout)).unwrap();
    spawn_proxy(state).await
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Accepts connections and never answers. Returns the address and the
/// number of connections accepted so far.
pub async fn black_hole() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(socket);
        }
    });
    (addr, accepted)
}

/// Accepts connections and closes them immediately.
pub async fn hang_up() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });
    addr
}
