//! Typed metric samples and the sink collectors write them into.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::error;

use super::catalog::{Catalog, MetricKind};

/// One observation produced during a scrape
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub key: &'static str,
    pub value: f64,
    pub labels: Vec<String>,
    pub kind: MetricKind,
}

/// Concurrency-safe append-only buffer for one scrape.
///
/// Every emission is checked against the catalog: the key must be registered
/// and the label values must match the declared label names one for one.
pub struct SampleSink {
    catalog: Arc<Catalog>,
    samples: Mutex<Vec<Sample>>,
}

impl SampleSink {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            samples: Mutex::new(Vec::new()),
        }
    }

    /// Record a sample; the kind comes from the descriptor
    pub fn emit(&self, key: &'static str, value: f64, labels: &[String]) {
        let Some(desc) = self.catalog.get(key) else {
            error!(metric = key, "sample for unregistered metric dropped");
            return;
        };
        if desc.labels.len() != labels.len() {
            error!(
                metric = %desc.name,
                expected = desc.labels.len(),
                got = labels.len(),
                "sample with wrong label count dropped"
            );
            return;
        }
        self.samples.lock().push(Sample {
            key,
            value,
            labels: labels.to_vec(),
            kind: desc.kind,
        });
    }

    /// Emit only when the mapped enum value is known
    pub fn emit_some(&self, key: &'static str, value: Option<f64>, labels: &[String]) {
        if let Some(value) = value {
            self.emit(key, value, labels);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain everything collected so far
    pub fn take(&self) -> Vec<Sample> {
        std::mem::take(&mut *self.samples.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::catalog::{HEALTH, NETWORK_ADAPTER_RX_BYTES, SCRAPE_STATUS};

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_emit_takes_kind_from_catalog() {
        let sink = SampleSink::new(Arc::new(Catalog::new()));
        sink.emit(NETWORK_ADAPTER_RX_BYTES, 42.0, &labels(&["network_adapter", "1", "NIC", "A"]));
        sink.emit(SCRAPE_STATUS, 1.0, &labels(&["chassis"]));

        let samples = sink.take();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].kind, MetricKind::Counter);
        assert_eq!(samples[1].kind, MetricKind::Gauge);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_invalid_emissions_are_dropped() {
        let sink = SampleSink::new(Arc::new(Catalog::new()));
        sink.emit("no_such_metric", 1.0, &labels(&["chassis", "1"]));
        sink.emit(HEALTH, 1.0, &labels(&["chassis"]));
        sink.emit_some(HEALTH, None, &labels(&["chassis", "1"]));
        assert_eq!(sink.len(), 0);

        sink.emit_some(HEALTH, Some(2.0), &labels(&["chassis", "1"]));
        assert_eq!(sink.len(), 1);
    }
}
