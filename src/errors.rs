//! Errors produced while reading annotation families from an Ingress

use thiserror::Error;

/// Failure kinds shared by every annotation handler
///
/// Callers react differently to each kind:
/// - `MissingAnnotation` means the feature is not configured and is skipped
/// - `InvalidContent` and `InvalidConfiguration` drop the feature for that
///   Ingress and are reported
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("annotation {name} is not present")]
    MissingAnnotation { name: String },

    #[error("annotation {name} contains invalid value {value:?}: {reason}")]
    InvalidContent {
        name: String,
        value: String,
        reason: String,
    },

    #[error("invalid {annotation} configuration: {reason}")]
    InvalidConfiguration { annotation: String, reason: String },
}

impl AnnotationError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingAnnotation { name: name.into() }
    }

    pub fn invalid_content(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidContent {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_configuration(annotation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            annotation: annotation.into(),
            reason: reason.into(),
        }
    }

    /// The annotation was absent (non-fatal for the extraction pass)
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingAnnotation { .. })
    }

    pub fn is_invalid_content(&self) -> bool {
        matches!(self, Self::InvalidContent { .. })
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

/// Map an absent annotation to the zero value of its type
///
/// Other failures pass through untouched.
pub fn or_default<T: Default>(result: Result<T, AnnotationError>) -> Result<T, AnnotationError> {
    match result {
        Err(AnnotationError::MissingAnnotation { .. }) => Ok(T::default()),
        other => other,
    }
}
