//! Loading Ingress objects from YAML manifests
//!
//! A manifest may hold several documents separated by `---`. Only
//! `networking.k8s.io/v1` Ingress documents are kept; other kinds and empty
//! documents are skipped.

use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::Resource;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("document {index} is not valid YAML: {source}")]
    Yaml {
        index: usize,
        source: serde_yaml::Error,
    },

    #[error("document {index} is not a valid Ingress: {source}")]
    Ingress {
        index: usize,
        source: serde_yaml::Error,
    },
}

/// Parse every Ingress in a (multi-document) YAML string
pub fn parse_ingresses(contents: &str) -> Result<Vec<Ingress>, ManifestError> {
    let mut ingresses = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let value = serde_yaml::Value::deserialize(document)
            .map_err(|source| ManifestError::Yaml { index, source })?;

        if !is_ingress(&value) {
            debug!(
                index,
                kind = value.get("kind").and_then(|k| k.as_str()).unwrap_or(""),
                "Skipping non-Ingress document"
            );
            continue;
        }

        let ingress: Ingress = serde_yaml::from_value(value)
            .map_err(|source| ManifestError::Ingress { index, source })?;
        ingresses.push(ingress);
    }

    Ok(ingresses)
}

/// Read a manifest file and parse every Ingress in it
pub async fn load_ingresses(path: &Path) -> Result<Vec<Ingress>, ManifestError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    parse_ingresses(&contents)
}

fn is_ingress(value: &serde_yaml::Value) -> bool {
    let api_version = value.get("apiVersion").and_then(|v| v.as_str());
    let kind = value.get("kind").and_then(|v| v.as_str());
    api_version == Some(Ingress::API_VERSION) && kind == Some(Ingress::KIND)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Tests can use unwrap/expect for brevity
#[path = "manifest_test.rs"]
mod tests;
