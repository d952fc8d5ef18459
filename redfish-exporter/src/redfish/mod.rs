//! Device-client collaborator
//!
//! The collectors only ever talk to a BMC through [`DeviceClient`]:
//! - `Ok(Some(_))` is data
//! - `Ok(None)` means the hardware does not expose that subsystem
//! - `Err(_)` is a fetch failure for this scrape only

pub mod client;
pub mod models;
mod wire;

use async_trait::async_trait;

pub use client::RedfishClient;
pub use models::{Chassis, NetworkAdapter, NetworkPort, Power, Thermal};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("session login failed: {0}")]
    Auth(String),
    #[error("scrape deadline exceeded")]
    DeadlineExceeded,
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Enumerate every chassis the BMC reports. Never cached.
    async fn list_chassis(&self) -> Result<Vec<Chassis>, ClientError>;

    async fn thermal(&self, chassis: &Chassis) -> Result<Option<Thermal>, ClientError>;

    async fn power(&self, chassis: &Chassis) -> Result<Option<Power>, ClientError>;

    async fn network_adapters(
        &self,
        chassis: &Chassis,
    ) -> Result<Option<Vec<NetworkAdapter>>, ClientError>;

    async fn network_ports(
        &self,
        adapter: &NetworkAdapter,
    ) -> Result<Option<Vec<NetworkPort>>, ClientError>;
}
