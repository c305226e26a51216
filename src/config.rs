//! Runtime settings
//!
//! Settings come from the environment (or CLI flags that fall back to it):
//! - `INGRESS_CANARY_ANNOTATIONS_PREFIX` - Annotation key prefix
//!   (default: `nginx.ingress.kubernetes.io`)

use crate::annotations::parser::{PrefixedReader, DEFAULT_ANNOTATIONS_PREFIX};
use thiserror::Error;

/// Environment variable holding the annotation prefix
pub const ANNOTATIONS_PREFIX_ENV: &str = "INGRESS_CANARY_ANNOTATIONS_PREFIX";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid annotations prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub annotations_prefix: String,
}

impl Settings {
    /// Build settings from a raw prefix
    ///
    /// Surrounding whitespace and a trailing `/` are dropped. An empty prefix
    /// falls back to the default. The rest must be a lowercase DNS-style
    /// name (`a-z`, `0-9`, `-`, `.`).
    pub fn new(prefix: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            annotations_prefix: normalize_prefix(prefix)?,
        })
    }

    /// Read settings from `INGRESS_CANARY_ANNOTATIONS_PREFIX`
    pub fn from_env() -> Result<Self, ConfigError> {
        let prefix = std::env::var(ANNOTATIONS_PREFIX_ENV).unwrap_or_default();
        Self::new(&prefix)
    }

    /// Annotation reader for the configured prefix
    pub fn reader(&self) -> PrefixedReader {
        PrefixedReader::new(self.annotations_prefix.clone())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            annotations_prefix: DEFAULT_ANNOTATIONS_PREFIX.to_string(),
        }
    }
}

fn normalize_prefix(raw: &str) -> Result<String, ConfigError> {
    let prefix = raw.trim().trim_end_matches('/');

    if prefix.is_empty() {
        return Ok(DEFAULT_ANNOTATIONS_PREFIX.to_string());
    }

    if let Some(c) = prefix
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '.'))
    {
        return Err(ConfigError::InvalidPrefix {
            prefix: raw.to_string(),
            reason: format!("unexpected character {:?}", c),
        });
    }

    if prefix.starts_with(['-', '.']) || prefix.ends_with(['-', '.']) {
        return Err(ConfigError::InvalidPrefix {
            prefix: raw.to_string(),
            reason: "must start and end with an alphanumeric character".to_string(),
        });
    }

    Ok(prefix.to_string())
}
