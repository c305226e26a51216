//! Annotation handlers for Ingress resources
//!
//! Each annotation family is parsed by a handler implementing [`IngressAnnotation`].
//! Handlers are registered by name in an [`Extractor`], which runs all of them
//! against an Ingress and keeps their results opaque until a consumer asks for
//! the concrete type it expects.
//!
//! - `canary` - Canary traffic-split configuration

pub mod canary;
pub mod extractor;
pub mod parser;

pub use extractor::{Extractor, IngressAnnotations};
pub use parser::{AnnotationReader, PrefixedReader, DEFAULT_ANNOTATIONS_PREFIX};

use crate::errors::AnnotationError;
use k8s_openapi::api::networking::v1::Ingress;
use std::any::Any;

/// Result of a handler, downcast by the consumer that knows its shape
pub type ParsedAnnotation = Box<dyn Any + Send + Sync>;

/// Parser for one annotation family
///
/// # Purity
/// `parse` must not have side effects beyond logging and must return the same
/// result for the same Ingress. The extractor may call it from many tasks at once.
pub trait IngressAnnotation: Send + Sync {
    /// Handler name, used as the registry key (e.g., "canary")
    fn name(&self) -> &'static str;

    /// Parse this family's annotations from the Ingress
    ///
    /// # Returns
    /// * `Ok(ParsedAnnotation)` - The handler's config value
    /// * `Err(AnnotationError::MissingAnnotation)` - Feature not configured (skip)
    /// * `Err(_)` - Malformed or inconsistent annotations
    fn parse(&self, ing: &Ingress) -> Result<ParsedAnnotation, AnnotationError>;
}
