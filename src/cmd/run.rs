//! `inference-proxy run`: start the proxy server.
//!
//! Loads and validates configuration, sets up logging, builds the
//! backend registry, and serves the catch-all router until Ctrl+C or
//! SIGTERM. Any configuration error aborts before the listener is bound.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::cli::{LogLevel, RunArgs};
use crate::config;
use crate::error::ProxyError;
use crate::logging;
use crate::proxy::ProxyServer;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), ProxyError> {
    let config = config::load(&args.config)?;

    // config::load has already validated the configured level.
    let level = args
        .log_level
        .or_else(|| LogLevel::from_config(&config.logging.level))
        .unwrap_or(LogLevel::Info);
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(level, log_format, &config.logging.output_dir)?;

    let state = Arc::new(AppState::new());
    let proxy = ProxyServer::from_config(&config, server::build_http_client())?;
    let service_count = proxy.registry().len();
    let default_service = proxy.registry().first().name().to_owned();
    state.initialize(proxy)?;

    let router = server::build_router(Arc::clone(&state), args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        config = %args.config.display(),
        services = service_count,
        default_service = %default_service,
        "inference-proxy started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!(
        forwarded = state.stats.forwarded.load(Ordering::Relaxed),
        failed = state.stats.failed.load(Ordering::Relaxed),
        "inference-proxy stopped"
    );
    Ok(())
}
