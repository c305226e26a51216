//! Typed access to prefixed Ingress annotations
//!
//! Annotation values are plain strings. Readers turn them into bools, integers
//! or strings and keep "absent" apart from "present but malformed".

use crate::errors::AnnotationError;
use std::collections::BTreeMap;

/// Prefix used when none is configured
pub const DEFAULT_ANNOTATIONS_PREFIX: &str = "nginx.ingress.kubernetes.io";

/// Build the full annotation key, e.g. `nginx.ingress.kubernetes.io/canary`
pub fn annotation_with_prefix(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix, name)
}

/// Decode a boolean literal
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Reader for typed annotation values
///
/// Implementors only provide `lookup`; the typed reads are derived from it.
pub trait AnnotationReader: Send + Sync {
    /// Key that annotation `name` is stored under, used in error reports
    fn qualified(&self, name: &str) -> String {
        name.to_string()
    }

    /// Raw value of annotation `name`
    ///
    /// # Returns
    /// * `Ok(&str)` - The annotation value
    /// * `Err(AnnotationError::MissingAnnotation)` - No annotations or key absent
    fn lookup<'a>(
        &self,
        name: &str,
        annotations: &'a BTreeMap<String, String>,
    ) -> Result<&'a str, AnnotationError>;

    fn read_bool(
        &self,
        name: &str,
        annotations: &BTreeMap<String, String>,
    ) -> Result<bool, AnnotationError> {
        let value = self.lookup(name, annotations)?;
        parse_bool(value).ok_or_else(|| {
            AnnotationError::invalid_content(self.qualified(name), value, "expected a boolean")
        })
    }

    fn read_int(
        &self,
        name: &str,
        annotations: &BTreeMap<String, String>,
    ) -> Result<i32, AnnotationError> {
        let value = self.lookup(name, annotations)?;
        value.parse::<i32>().map_err(|e| {
            AnnotationError::invalid_content(
                self.qualified(name),
                value,
                format!("expected an integer: {}", e),
            )
        })
    }

    fn read_string(
        &self,
        name: &str,
        annotations: &BTreeMap<String, String>,
    ) -> Result<String, AnnotationError> {
        let value = self.lookup(name, annotations)?;
        if value.is_empty() {
            return Err(AnnotationError::invalid_content(
                self.qualified(name),
                value,
                "expected a non-empty string",
            ));
        }
        Ok(value.to_string())
    }
}

/// Reads annotations stored under `<prefix>/<name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedReader {
    prefix: String,
}

impl PrefixedReader {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for PrefixedReader {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOTATIONS_PREFIX)
    }
}

impl AnnotationReader for PrefixedReader {
    fn qualified(&self, name: &str) -> String {
        annotation_with_prefix(&self.prefix, name)
    }

    fn lookup<'a>(
        &self,
        name: &str,
        annotations: &'a BTreeMap<String, String>,
    ) -> Result<&'a str, AnnotationError> {
        let key = self.qualified(name);
        annotations
            .get(&key)
            .map(String::as_str)
            .ok_or_else(|| AnnotationError::missing(key))
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
