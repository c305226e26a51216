//! Cross-resource lookups for annotation handlers
//!
//! Handlers receive a `Resolver` at construction so they can later follow
//! references to Secrets or Services without changing how they are built.
//! Keys use the `namespace/name` form.

use k8s_openapi::api::core::v1::{Secret, Service};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error("invalid resource key {0:?}: expected namespace/name")]
    InvalidKey(String),

    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },
}

/// Lookup of cluster objects referenced from annotations
pub trait Resolver: Send + Sync {
    fn get_secret(&self, key: &str) -> Result<Secret, ResolverError>;

    fn get_service(&self, key: &str) -> Result<Service, ResolverError>;
}

/// Split a `namespace/name` key
pub fn parse_key(key: &str) -> Result<(&str, &str), ResolverError> {
    match key.split_once('/') {
        Some((namespace, name))
            if !namespace.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((namespace, name))
        }
        _ => Err(ResolverError::InvalidKey(key.to_string())),
    }
}

/// Resolver for contexts without cluster access
///
/// Every well-formed key resolves to `NotFound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResolver;

impl Resolver for OfflineResolver {
    fn get_secret(&self, key: &str) -> Result<Secret, ResolverError> {
        parse_key(key)?;
        Err(ResolverError::NotFound {
            kind: "Secret",
            key: key.to_string(),
        })
    }

    fn get_service(&self, key: &str) -> Result<Service, ResolverError> {
        parse_key(key)?;
        Err(ResolverError::NotFound {
            kind: "Service",
            key: key.to_string(),
        })
    }
}

/// Mock resolver backed by in-memory objects
#[cfg(test)]
#[derive(Default)]
pub struct MockResolver {
    pub secrets: std::collections::BTreeMap<String, Secret>,
}

#[cfg(test)]
impl Resolver for MockResolver {
    fn get_secret(&self, key: &str) -> Result<Secret, ResolverError> {
        parse_key(key)?;
        self.secrets
            .get(key)
            .cloned()
            .ok_or_else(|| ResolverError::NotFound {
                kind: "Secret",
                key: key.to_string(),
            })
    }

    fn get_service(&self, key: &str) -> Result<Service, ResolverError> {
        parse_key(key)?;
        Err(ResolverError::NotFound {
            kind: "Service",
            key: key.to_string(),
        })
    }
}
