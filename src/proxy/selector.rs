//! Backend selection for incoming requests.
//!
//! [`RouteSelector`] is the seam where routing policy lives. The only
//! policy today is [`FirstService`], which ignores the path and always
//! picks the first configured service. Path- or header-based selectors
//! can be added as further implementations without touching the
//! forwarding engine.

use std::sync::Arc;

use super::registry::{BackendRegistry, ServiceDescriptor};

pub trait RouteSelector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolve a request path to the service that should handle it.
    /// `None` means no route matched.
    fn select(&self, path: &str) -> Option<&ServiceDescriptor>;
}

/// Routes every request to the registry's first service.
#[derive(Debug)]
pub struct FirstService {
    registry: Arc<BackendRegistry>,
}

impl FirstService {
    #[must_use]
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        Self { registry }
    }
}

impl RouteSelector for FirstService {
    fn name(&self) -> &'static str {
        "first-service"
    }

    fn select(&self, _path: &str) -> Option<&ServiceDescriptor> {
        Some(self.registry.first())
    }
}
