//! Single-target request forwarding with streamed responses.
//!
//! [`ForwardingEngine::forward`] rebuilds the inbound request against
//! the selected backend, sends it through the shared pooled client,
//! and hands the backend's response back with its body still
//! streaming. Transport failures are classified into the closed
//! [`ForwardFailure`] enum, each with a fixed status code.
//!
//! A forward is exactly one attempt. The timeout covers connecting,
//! writing the request, and receiving the response head; the body is
//! relayed afterwards without a deadline.

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http_body_util::LengthLimitError;
use serde::{Deserialize, Serialize};

use super::registry::ServiceDescriptor;
use crate::server::HttpClient;

pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(30);

/// The parts of an inbound request that are relayed to a backend.
#[derive(Debug)]
pub struct ForwardRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Body,
}

impl ForwardRequest {
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Path plus query string; `/` when the inbound target was empty.
    #[must_use]
    pub fn path_and_query(&self) -> &str {
        self.uri.path_and_query().map_or("/", |pq| pq.as_str())
    }
}

impl From<Request<Body>> for ForwardRequest {
    fn from(request: Request<Body>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ForwardFailure {
    #[error("Gateway Timeout")]
    Timeout { after: Duration },

    #[error("Bad Gateway")]
    Connection { detail: String },

    /// The inbound body outgrew the request body limit while streaming.
    #[error("Payload Too Large")]
    PayloadTooLarge { detail: String },

    #[error("{detail}")]
    Unexpected { detail: String },
}

impl ForwardFailure {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Connection { .. } => StatusCode::BAD_GATEWAY,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Diagnostic text for logs. Richer than the caller-facing message.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Timeout { after } => format!("no response within {}ms", after.as_millis()),
            Self::Connection { detail }
            | Self::PayloadTooLarge { detail }
            | Self::Unexpected { detail } => detail.clone(),
        }
    }
}

impl IntoResponse for ForwardFailure {
    fn into_response(self) -> Response {
        error_response(self.status(), self.to_string())
    }
}

/// JSON body of every response the proxy produces itself.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

pub fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
        .into_response()
}

#[derive(Clone)]
pub struct ForwardingEngine {
    client: HttpClient,
    timeout: Duration,
}

impl ForwardingEngine {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            timeout: FORWARD_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn forward(
        &self,
        request: ForwardRequest,
        target: &ServiceDescriptor,
    ) -> Result<Response, ForwardFailure> {
        let url = format!("{}{}", target.base_url(), request.path_and_query());
        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| {
            ForwardFailure::Unexpected {
                detail: format!("invalid upstream URL '{url}': {e}"),
            }
        })?;

        tracing::debug!(service = target.name(), url = %uri, "dispatching upstream request");

        // Headers are relayed verbatim, Host included.
        let mut builder = hyper::Request::builder().method(request.method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            *headers = request.headers;
        }
        let outbound = builder
            .body(request.body)
            .map_err(|e| ForwardFailure::Unexpected {
                detail: e.to_string(),
            })?;

        match tokio::time::timeout(self.timeout, self.client.request(outbound)).await {
            Ok(Ok(response)) => {
                let (parts, body) = response.into_parts();
                Ok(Response::from_parts(parts, Body::new(body)))
            }
            Ok(Err(e)) if e.is_connect() => Err(ForwardFailure::Connection {
                detail: error_chain(&e),
            }),
            Ok(Err(e)) if exceeded_body_limit(&e) => Err(ForwardFailure::PayloadTooLarge {
                detail: error_chain(&e),
            }),
            Ok(Err(e)) => Err(ForwardFailure::Unexpected {
                detail: error_chain(&e),
            }),
            Err(_) => Err(ForwardFailure::Timeout {
                after: self.timeout,
            }),
        }
    }
}

/// Chunked bodies are only measured while they stream, so the limit
/// surfaces as a send error somewhere down the source chain.
fn exceeded_body_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Render an error and all of its sources as `outer: inner: root`.
/// A source already spelled out by its parent is not repeated.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !detail.ends_with(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = inner.source();
    }
    detail
}
