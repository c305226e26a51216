//! Canary traffic-split configuration for Ingress resources
//!
//! Reads the `canary*` annotations of an Ingress, validates them and produces an
//! immutable [`annotations::canary::Config`] for the backend-weighting layer.

pub mod annotations;
pub mod config;
pub mod errors;
pub mod manifest;
pub mod report;
pub mod resolver;
