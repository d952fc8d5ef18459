/*!
Stub device client for scrape tests without a BMC

Every answer is scripted per chassis (or adapter) id. Unscripted subsystems
answer "absent". All calls are recorded so tests can assert what the
collectors asked for, and optional per-operation delays let tests exercise
the scrape deadline and the concurrency bound.
*/

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use redfish_exporter::redfish::models::{Chassis, NetworkAdapter, NetworkPort, Power, Thermal};
use redfish_exporter::redfish::{ClientError, DeviceClient};

/// Scripted answer for one subsystem fetch
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Data(T),
    Absent,
    /// Fails with this HTTP status
    Fail(u16),
}

impl<T: Clone> Reply<T> {
    fn resolve(&self, what: &str) -> Result<Option<T>, ClientError> {
        match self {
            Reply::Data(data) => Ok(Some(data.clone())),
            Reply::Absent => Ok(None),
            Reply::Fail(status) => Err(ClientError::Status {
                status: *status,
                url: format!("stub://{what}"),
            }),
        }
    }
}

/// Operation names used for call recording and delays
pub const LIST_CHASSIS: &str = "list_chassis";
pub const THERMAL: &str = "thermal";
pub const POWER: &str = "power";
pub const NETWORK_ADAPTERS: &str = "network_adapters";
pub const NETWORK_PORTS: &str = "network_ports";

#[derive(Default)]
pub struct StubDevice {
    chassis: Vec<Chassis>,
    discovery_failure: Option<u16>,
    thermal: HashMap<String, Reply<Thermal>>,
    power: HashMap<String, Reply<Power>>,
    adapters: HashMap<String, Reply<Vec<NetworkAdapter>>>,
    ports: HashMap<String, Reply<Vec<NetworkPort>>>,
    delays: HashMap<&'static str, Duration>,
    calls: Mutex<Vec<(String, String)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chassis(mut self, chassis: Vec<Chassis>) -> Self {
        self.chassis = chassis;
        self
    }

    /// Make chassis discovery fail with the given HTTP status
    pub fn failing_discovery(mut self, status: u16) -> Self {
        self.discovery_failure = Some(status);
        self
    }

    pub fn with_thermal(mut self, chassis_id: &str, reply: Reply<Thermal>) -> Self {
        self.thermal.insert(chassis_id.to_string(), reply);
        self
    }

    pub fn with_power(mut self, chassis_id: &str, reply: Reply<Power>) -> Self {
        self.power.insert(chassis_id.to_string(), reply);
        self
    }

    pub fn with_adapters(mut self, chassis_id: &str, reply: Reply<Vec<NetworkAdapter>>) -> Self {
        self.adapters.insert(chassis_id.to_string(), reply);
        self
    }

    pub fn with_ports(mut self, adapter_id: &str, reply: Reply<Vec<NetworkPort>>) -> Self {
        self.ports.insert(adapter_id.to_string(), reply);
        self
    }

    /// Sleep before answering `operation`
    pub fn with_delay(mut self, operation: &'static str, delay: Duration) -> Self {
        self.delays.insert(operation, delay);
        self
    }

    /// Every recorded `(operation, id)` pair, in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.lock().iter().filter(|(op, _)| op == operation).count()
    }

    /// Highest number of subsystem fetches observed running at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, operation: &'static str, id: &str) -> InFlight<'_> {
        self.calls.lock().push((operation.to_string(), id.to_string()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);
        if let Some(delay) = self.delays.get(operation) {
            tokio::time::sleep(*delay).await;
        }
        guard
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lookup<T: Clone>(
    replies: &HashMap<String, Reply<T>>,
    id: &str,
    what: &str,
) -> Result<Option<T>, ClientError> {
    replies
        .get(id)
        .map(|reply| reply.resolve(&format!("{what}/{id}")))
        .unwrap_or(Ok(None))
}

#[async_trait]
impl DeviceClient for StubDevice {
    async fn list_chassis(&self) -> Result<Vec<Chassis>, ClientError> {
        let _guard = self.enter(LIST_CHASSIS, "").await;
        if let Some(status) = self.discovery_failure {
            return Err(ClientError::Status {
                status,
                url: "stub://Chassis".into(),
            });
        }
        Ok(self.chassis.clone())
    }

    async fn thermal(&self, chassis: &Chassis) -> Result<Option<Thermal>, ClientError> {
        let _guard = self.enter(THERMAL, &chassis.id).await;
        lookup(&self.thermal, &chassis.id, THERMAL)
    }

    async fn power(&self, chassis: &Chassis) -> Result<Option<Power>, ClientError> {
        let _guard = self.enter(POWER, &chassis.id).await;
        lookup(&self.power, &chassis.id, POWER)
    }

    async fn network_adapters(
        &self,
        chassis: &Chassis,
    ) -> Result<Option<Vec<NetworkAdapter>>, ClientError> {
        let _guard = self.enter(NETWORK_ADAPTERS, &chassis.id).await;
        lookup(&self.adapters, &chassis.id, NETWORK_ADAPTERS)
    }

    async fn network_ports(
        &self,
        adapter: &NetworkAdapter,
    ) -> Result<Option<Vec<NetworkPort>>, ClientError> {
        let _guard = self.enter(NETWORK_PORTS, &adapter.id).await;
        lookup(&self.ports, &adapter.id, NETWORK_PORTS)
    }
}
