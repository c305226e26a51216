//! Name-keyed registry of annotation handlers
//!
//! The extractor runs every registered handler against an Ingress and collects
//! the results. A handler reporting `MissingAnnotation` is treated as "not
//! configured"; any other failure is recorded for that handler only and never
//! aborts the pass.

use super::canary::{self, Canary};
use super::parser::PrefixedReader;
use super::{IngressAnnotation, ParsedAnnotation};
use crate::errors::AnnotationError;
use crate::resolver::Resolver;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry of annotation handlers keyed by handler name
#[derive(Default)]
pub struct Extractor {
    handlers: BTreeMap<&'static str, Box<dyn IngressAnnotation>>,
}

impl Extractor {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in handler
    pub fn with_defaults(resolver: Arc<dyn Resolver>, reader: PrefixedReader) -> Self {
        let mut extractor = Self::new();
        extractor.register(Box::new(Canary::with_reader(resolver, reader)));
        extractor
    }

    /// Register a handler under its name
    ///
    /// # Returns
    /// The handler previously registered under the same name, if any
    pub fn register(
        &mut self,
        handler: Box<dyn IngressAnnotation>,
    ) -> Option<Box<dyn IngressAnnotation>> {
        self.handlers.insert(handler.name(), handler)
    }

    /// Registered handler names, in sorted order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Run every handler against the Ingress
    pub fn extract(&self, ing: &Ingress) -> IngressAnnotations {
        let namespace = ing.namespace().unwrap_or_default();
        let name = ing.name_any();

        let mut extracted = IngressAnnotations::default();
        for (&handler, parser) in &self.handlers {
            match parser.parse(ing) {
                Ok(value) => {
                    extracted.values.insert(handler, value);
                }
                Err(error) if error.is_missing() => {
                    debug!(
                        ingress = %name,
                        namespace = %namespace,
                        annotation = handler,
                        "Annotation not configured"
                    );
                }
                Err(error) => {
                    warn!(
                        ingress = %name,
                        namespace = %namespace,
                        annotation = handler,
                        error = %error,
                        "Skipping invalid annotation configuration"
                    );
                    extracted.errors.insert(handler, error);
                }
            }
        }

        extracted
    }
}

/// Handler results for one Ingress
#[derive(Debug, Default)]
pub struct IngressAnnotations {
    values: BTreeMap<&'static str, ParsedAnnotation>,
    errors: BTreeMap<&'static str, AnnotationError>,
}

impl IngressAnnotations {
    /// Result of handler `name`, if it parsed and has type `T`
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn canary(&self) -> Option<&canary::Config> {
        self.get::<canary::Config>(canary::NAME)
    }

    /// Whether handler `name` produced a value
    pub fn is_configured(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Failure of handler `name`; absent annotations are not failures
    pub fn error(&self, name: &str) -> Option<&AnnotationError> {
        self.errors.get(name)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &AnnotationError)> + '_ {
        self.errors.iter().map(|(name, error)| (*name, error))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.errors.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Tests can use unwrap/expect for brevity
#[path = "extractor_test.rs"]
mod tests;
