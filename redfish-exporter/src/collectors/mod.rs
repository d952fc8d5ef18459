//! Collection-and-mapping engine
//!
//! - `states`: health/state enum → fixed numeric encoding
//! - `catalog`: static metric descriptors
//! - `sample`: typed samples and the shared per-scrape sink
//! - `chassis`: the scrape orchestrator and its subsystem collectors

pub mod catalog;
pub mod chassis;
pub mod sample;
pub mod states;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

use crate::redfish::models::{Chassis, Status};
use crate::redfish::{ClientError, DeviceClient};

pub use catalog::{Catalog, MetricDesc, MetricKind};
pub use chassis::{ChassisCollector, CollectorOptions};
pub use sample::{Sample, SampleSink};

/// Per-scrape state handed to every collector task
#[derive(Clone)]
pub struct ScrapeContext {
    pub client: Arc<dyn DeviceClient>,
    pub deadline: Instant,
}

impl ScrapeContext {
    /// Run a device fetch under the scrape deadline
    pub async fn fetch<T, F>(&self, fetch: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        tokio::time::timeout_at(self.deadline, fetch)
            .await
            .unwrap_or(Err(ClientError::DeadlineExceeded))
    }
}

/// One subsystem group collected per chassis.
///
/// Implementations never fail the scrape: fetch errors are logged at error
/// level, absent subsystems at warn level, and the collector simply returns.
#[async_trait]
pub trait SubsystemCollector: Send + Sync {
    fn name(&self) -> &'static str;

    async fn collect(&self, ctx: &ScrapeContext, chassis: &Chassis, sink: &SampleSink);
}

/// Emit the health and state gauges of a component, skipping unknown values
pub(crate) fn emit_status(
    sink: &SampleSink,
    health_key: &'static str,
    state_key: &'static str,
    status: &Status,
    labels: &[String],
) {
    let health = states::health_to_value(status.health.as_ref());
    if let (None, Some(raw)) = (health, &status.health) {
        debug!(metric = health_key, health = %raw, "unrecognized health value skipped");
    }
    sink.emit_some(health_key, health, labels);

    let state = states::state_to_value(status.state.as_ref());
    if let (None, Some(raw)) = (state, &status.state) {
        debug!(metric = state_key, state = %raw, "unrecognized state value skipped");
    }
    sink.emit_some(state_key, state, labels);
}

/// Build a label-value vector from borrowed parts
pub(crate) fn label_values(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}
