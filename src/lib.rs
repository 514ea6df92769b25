//! An HTTP reverse proxy in front of containerized inference services.
//!
//! Every inbound request, whatever its method or path, is routed to one
//! backend service from a statically configured set, forwarded with its
//! method, headers, and body intact, and answered with the backend's
//! response streamed straight through. Transport failures become fixed
//! 502 / 504 / 500 responses.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate).
//! - [`config`] -- YAML settings, environment overrides, and validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Backend registry, route selection, and the forwarding engine.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod server;
