//! Canary traffic-split annotations
//!
//! Reads `canary`, `canary-weight`, `canary-by-header` and `canary-by-cookie`
//! and produces a validated [`Config`].

use super::parser::{AnnotationReader, PrefixedReader};
use super::{IngressAnnotation, ParsedAnnotation};
use crate::errors::{or_default, AnnotationError};
use crate::resolver::Resolver;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Handler name in the extractor registry
pub const NAME: &str = "canary";

pub const CANARY_ANNOTATION: &str = "canary";
pub const WEIGHT_ANNOTATION: &str = "canary-weight";
pub const HEADER_ANNOTATION: &str = "canary-by-header";
pub const COOKIE_ANNOTATION: &str = "canary-by-cookie";

/// Upper bound of `canary-weight` (percent)
pub const MAX_WEIGHT: i32 = 100;

/// Canary routing configuration for one Ingress
///
/// Weight, header and cookie only carry meaning when `enabled` is true; a
/// disabled config always holds their zero values.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct Config {
    /// Whether canary routing is active for this Ingress
    pub enabled: bool,

    /// Percentage of traffic sent to the canary backend (0-100)
    pub weight: i32,

    /// Request header that forces canary routing
    pub header: String,

    /// Request cookie that forces canary routing
    pub cookie: String,
}

/// Canary annotation handler
///
/// Holds a [`Resolver`] for lookups of referenced objects; canary parsing does
/// not need one yet.
pub struct Canary<R = PrefixedReader> {
    resolver: Arc<dyn Resolver>,
    reader: R,
}

impl Canary<PrefixedReader> {
    /// Handler reading annotations under the default prefix
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self::with_reader(resolver, PrefixedReader::default())
    }
}

impl<R: AnnotationReader> Canary<R> {
    pub fn with_reader(resolver: Arc<dyn Resolver>, reader: R) -> Self {
        Self { resolver, reader }
    }

    pub fn resolver(&self) -> &Arc<dyn Resolver> {
        &self.resolver
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Parse canary settings from an annotation mapping
    ///
    /// # Returns
    /// * `Ok(Config)` - Validated configuration
    /// * `Err(MissingAnnotation)` - `canary` is absent, canary is not configured
    /// * `Err(InvalidContent)` - A value does not decode as its type
    /// * `Err(InvalidConfiguration)` - Fields set while disabled, or weight out of range
    ///
    /// Only `canary` gates the feature; the other annotations default to their
    /// zero value when absent.
    pub fn parse_annotations(
        &self,
        annotations: &BTreeMap<String, String>,
    ) -> Result<Config, AnnotationError> {
        let enabled = self.reader.read_bool(CANARY_ANNOTATION, annotations)?;
        let weight = or_default(self.reader.read_int(WEIGHT_ANNOTATION, annotations))?;
        let header = or_default(self.reader.read_string(HEADER_ANNOTATION, annotations))?;
        let cookie = or_default(self.reader.read_string(COOKIE_ANNOTATION, annotations))?;

        let config = Config {
            enabled,
            weight,
            header,
            cookie,
        };
        validate_config(&config)?;

        debug!(
            enabled = config.enabled,
            weight = config.weight,
            header = %config.header,
            cookie = %config.cookie,
            "Parsed canary annotations"
        );

        Ok(config)
    }
}

impl<R: AnnotationReader + 'static> IngressAnnotation for Canary<R> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, ing: &Ingress) -> Result<ParsedAnnotation, AnnotationError> {
        let config = self.parse_annotations(ing.annotations())?;
        Ok(Box::new(config))
    }
}

/// Validate cross-field constraints of a canary config
///
/// # Validation Rules
/// - Disabled canary must not set weight, header or cookie
/// - `weight` must be 0-100
pub fn validate_config(config: &Config) -> Result<(), AnnotationError> {
    if !config.enabled
        && (config.weight > 0 || !config.header.is_empty() || !config.cookie.is_empty())
    {
        return Err(AnnotationError::invalid_configuration(
            NAME,
            "canary-weight, canary-by-header and canary-by-cookie require canary to be enabled",
        ));
    }

    if !(0..=MAX_WEIGHT).contains(&config.weight) {
        return Err(AnnotationError::invalid_configuration(
            NAME,
            format!("canary-weight must be 0-{}, got {}", MAX_WEIGHT, config.weight),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Tests can use unwrap/expect for brevity
#[path = "canary_test.rs"]
mod tests;
