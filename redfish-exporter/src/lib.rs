//! Redfish BMC → Prometheus exporter
//!
//! - `redfish`: device client (trait + HTTP implementation) and typed models
//! - `collectors`: per-scrape collection and metric mapping
//! - `exposition`: Prometheus text rendering
//! - `http`: axum routes (`/metrics`, `/healthz`, `/`)
//! - `config`: YAML + environment configuration

pub mod collectors;
pub mod config;
pub mod exposition;
pub mod http;
pub mod redfish;
