//! Chassis scrape orchestrator
//!
//! One scrape:
//! 1. discover the chassis list (failure → `collector_scrape_status` 0, done)
//! 2. spawn one task per (chassis × subsystem collector), bounded by a semaphore
//! 3. wait for every task
//! 4. report `collector_scrape_status{collector="chassis"}` 1
//!
//! Nothing is kept between scrapes.

mod basic;
pub mod fan;
mod network;
mod power;
mod thermal;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error};

pub use basic::BasicCollector;
pub use network::NetworkCollector;
pub use power::PowerCollector;
pub use thermal::ThermalCollector;

use super::catalog::{Catalog, MetricDesc, SCRAPE_STATUS, SUBSYSTEM};
use super::{Sample, SampleSink, ScrapeContext, SubsystemCollector};
use crate::config::{CollectorKind, Config};
use crate::redfish::DeviceClient;

/// Tuning knobs for the orchestrator
#[derive(Debug, Clone)]
pub struct CollectorOptions {
    pub collectors: Vec<CollectorKind>,
    pub max_concurrency: usize,
    pub scrape_timeout: Duration,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            collectors: CollectorKind::ALL.to_vec(),
            max_concurrency: 16,
            scrape_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Config> for CollectorOptions {
    fn from(config: &Config) -> Self {
        Self {
            collectors: config.collectors.clone(),
            max_concurrency: config.scrape.max_concurrency,
            scrape_timeout: config.scrape.timeout(),
        }
    }
}

fn subsystem_collector(kind: CollectorKind) -> Arc<dyn SubsystemCollector> {
    match kind {
        CollectorKind::Basic => Arc::new(BasicCollector),
        CollectorKind::Thermal => Arc::new(ThermalCollector),
        CollectorKind::Power => Arc::new(PowerCollector),
        CollectorKind::Network => Arc::new(NetworkCollector),
    }
}

pub struct ChassisCollector {
    client: Arc<dyn DeviceClient>,
    catalog: Arc<Catalog>,
    collectors: Vec<Arc<dyn SubsystemCollector>>,
    limiter: Arc<Semaphore>,
    scrape_timeout: Duration,
}

impl ChassisCollector {
    pub fn new(client: Arc<dyn DeviceClient>, catalog: Arc<Catalog>, options: CollectorOptions) -> Self {
        let mut kinds: Vec<CollectorKind> = Vec::new();
        for kind in options.collectors {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Self {
            client,
            catalog,
            collectors: kinds.into_iter().map(subsystem_collector).collect(),
            limiter: Arc::new(Semaphore::new(options.max_concurrency.max(1))),
            scrape_timeout: options.scrape_timeout,
        }
    }

    /// Names of the subsystem collectors run per chassis
    pub fn collector_names(&self) -> Vec<&'static str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Every registered descriptor plus the scrape-status descriptor
    pub fn describe(&self) -> Vec<&MetricDesc> {
        self.catalog.describe()
    }

    /// Run one full scrape and return its samples
    pub async fn collect(&self) -> Vec<Sample> {
        debug!("Collecting chassis metrics");
        let sink = Arc::new(SampleSink::new(self.catalog.clone()));
        let status_labels = [SUBSYSTEM.to_string()];
        let ctx = ScrapeContext {
            client: self.client.clone(),
            deadline: Instant::now() + self.scrape_timeout,
        };

        let chassis_list = match ctx.fetch(self.client.list_chassis()).await {
            Ok(list) => list,
            Err(e) => {
                error!(error = %e, "Failed to get chassis");
                sink.emit(SCRAPE_STATUS, 0.0, &status_labels);
                return sink.take();
            }
        };

        let mut tasks = JoinSet::new();
        for chassis in chassis_list.into_iter().map(Arc::new) {
            for collector in &self.collectors {
                let collector = collector.clone();
                let chassis = chassis.clone();
                let sink = sink.clone();
                let ctx = ctx.clone();
                let limiter = self.limiter.clone();
                tasks.spawn(async move {
                    let Ok(_permit) = limiter.acquire_owned().await else {
                        return;
                    };
                    debug!(collector = collector.name(), chassis_id = %chassis.id, "Running collector");
                    collector.collect(&ctx, &chassis, &sink).await;
                });
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "chassis collector task aborted");
            }
        }

        sink.emit(SCRAPE_STATUS, 1.0, &status_labels);
        debug!(samples = sink.len(), "Finished collecting chassis metrics");
        sink.take()
    }
}
