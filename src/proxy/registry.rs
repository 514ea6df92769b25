//! Immutable, ordered mapping of service names to backend addresses.
//!
//! The [`BackendRegistry`] is built once from validated configuration
//! and never mutated afterwards, so it is shared across request tasks
//! behind an `Arc` without locking. Insertion order is kept because the
//! route selector treats the first service as the default target.

use std::collections::HashMap;

use crate::config::model::Config;
use crate::error::ProxyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: String,
    address: String,
    base_url: String,
}

impl ServiceDescriptor {
    /// `address` is `host:port`, reachable over plain HTTP.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        let address = address.into();
        let base_url = format!("http://{address}");
        Self {
            name: name.into(),
            address,
            base_url,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// `http://host:port`, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug)]
pub struct BackendRegistry {
    services: Vec<ServiceDescriptor>,
    by_name: HashMap<String, usize>,
}

impl BackendRegistry {
    /// Fails with a configuration error when `services` is empty or
    /// contains a duplicate name.
    pub fn new(services: Vec<ServiceDescriptor>) -> Result<Self, ProxyError> {
        if services.is_empty() {
            return Err(ProxyError::EmptyRegistry);
        }

        let mut by_name = HashMap::with_capacity(services.len());
        for (idx, service) in services.iter().enumerate() {
            if by_name.insert(service.name.clone(), idx).is_some() {
                return Err(ProxyError::DuplicateService {
                    name: service.name.clone(),
                });
            }
        }

        Ok(Self { services, by_name })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProxyError> {
        Self::new(
            config
                .services
                .iter()
                .map(|s| ServiceDescriptor::new(&s.name, s.address()))
                .collect(),
        )
    }

    /// Base URL of the named service.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&idx| self.services[idx].base_url())
    }

    /// All services in configuration order.
    #[must_use]
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// The highest-priority service. Always present.
    #[must_use]
    pub fn first(&self) -> &ServiceDescriptor {
        // construction rejects empty lists
        &self.services[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
