//! Per-Ingress canary report printed by the CLI

use crate::annotations::canary::{self, Config};
use crate::annotations::IngressAnnotations;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use serde::Serialize;

/// Outcome of canary extraction for one Ingress
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReportStatus {
    Configured { config: Config },
    NotConfigured,
    Invalid { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanaryReport {
    /// Manifest the Ingress was read from
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub status: ReportStatus,
}

impl CanaryReport {
    pub fn from_extracted(source: &str, ing: &Ingress, extracted: &IngressAnnotations) -> Self {
        let status = if let Some(config) = extracted.canary() {
            ReportStatus::Configured {
                config: config.clone(),
            }
        } else if let Some(error) = extracted.error(canary::NAME) {
            ReportStatus::Invalid {
                message: error.to_string(),
            }
        } else {
            ReportStatus::NotConfigured
        };

        Self {
            source: source.to_string(),
            namespace: ing.namespace(),
            name: ing.name_any(),
            status,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.status, ReportStatus::Invalid { .. })
    }
}
