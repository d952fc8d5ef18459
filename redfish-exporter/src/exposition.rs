//! Prometheus text exposition of a scrape
//!
//! Each scrape gets a fresh `Registry` holding one vec per described metric,
//! so nothing from a previous scrape can leak into the next. Process metrics
//! live in a long-lived base registry gathered alongside.

use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::collectors::{ChassisCollector, MetricDesc, MetricKind, Sample};

pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

#[derive(Debug, thiserror::Error)]
pub enum ExpositionError {
    #[error("prometheus: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("encoded metrics are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

enum Family {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

/// Encode samples against their descriptors, plus anything in `base`
pub fn render(
    descs: &[&MetricDesc],
    samples: &[Sample],
    base: Option<&Registry>,
) -> Result<String, ExpositionError> {
    let registry = Registry::new();
    let mut families: HashMap<&str, Family> = HashMap::with_capacity(descs.len());

    for desc in descs {
        let opts = Opts::new(desc.name.clone(), desc.help.clone());
        let family = match desc.kind {
            MetricKind::Gauge => {
                let vec = GaugeVec::new(opts, &desc.labels)?;
                registry.register(Box::new(vec.clone()))?;
                Family::Gauge(vec)
            }
            MetricKind::Counter => {
                let vec = CounterVec::new(opts, &desc.labels)?;
                registry.register(Box::new(vec.clone()))?;
                Family::Counter(vec)
            }
        };
        families.insert(desc.key, family);
    }

    for sample in samples {
        let Some(family) = families.get(sample.key) else {
            warn!(metric = sample.key, "sample without descriptor skipped");
            continue;
        };
        let values: Vec<&str> = sample.labels.iter().map(String::as_str).collect();
        match family {
            Family::Gauge(vec) => vec.get_metric_with_label_values(&values)?.set(sample.value),
            Family::Counter(vec) => {
                // inc_by panics on negative or NaN input
                if sample.value.is_nan() || sample.value < 0.0 {
                    warn!(metric = sample.key, value = sample.value, "invalid counter value skipped");
                    continue;
                }
                let counter = vec.get_metric_with_label_values(&values)?;
                counter.reset();
                counter.inc_by(sample.value);
            }
        }
    }

    let mut metric_families = registry.gather();
    if let Some(base) = base {
        metric_families.extend(base.gather());
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Scrape entry point used by the HTTP layer
pub struct MetricsExporter {
    collector: Arc<ChassisCollector>,
    base: Registry,
}

impl MetricsExporter {
    pub fn new(collector: Arc<ChassisCollector>) -> Self {
        let base = Registry::new();
        #[cfg(target_os = "linux")]
        {
            let process = prometheus::process_collector::ProcessCollector::for_self();
            if let Err(e) = base.register(Box::new(process)) {
                warn!(error = %e, "process metrics unavailable");
            }
        }
        Self { collector, base }
    }

    /// Run one scrape and encode it
    pub async fn scrape(&self) -> Result<String, ExpositionError> {
        let samples = self.collector.collect().await;
        render(&self.collector.describe(), &samples, Some(&self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::catalog::{Catalog, FAN_RPM, NETWORK_ADAPTER_TX_BYTES, SCRAPE_STATUS};

    fn sample(key: &'static str, value: f64, labels: &[&str], kind: MetricKind) -> Sample {
        Sample {
            key,
            value,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            kind,
        }
    }

    #[test]
    fn test_render_gauges_and_counters() {
        let catalog = Catalog::new();
        let samples = vec![
            sample(FAN_RPM, 4200.0, &["fan", "1", "Fan 1", "0", "rpm"], MetricKind::Gauge),
            sample(
                NETWORK_ADAPTER_TX_BYTES,
                1024.0,
                &["network_adapter", "1", "NIC 1", "A"],
                MetricKind::Counter,
            ),
            sample(SCRAPE_STATUS, 1.0, &["chassis"], MetricKind::Gauge),
        ];

        let text = render(&catalog.describe(), &samples, None).unwrap();

        assert!(text.contains("# TYPE redfish_chassis_fan_rpm gauge"));
        let fan_line = text
            .lines()
            .find(|l| l.starts_with("redfish_chassis_fan_rpm{"))
            .unwrap();
        assert!(fan_line.contains(r#"fan="Fan 1""#));
        assert!(fan_line.contains(r#"fan_unit="rpm""#));
        assert!(fan_line.ends_with(" 4200"));
        assert!(text.contains("# TYPE redfish_chassis_network_adapter_tx_bytes counter"));
        assert!(text.contains(r#"redfish_collector_scrape_status{collector="chassis"} 1"#));
        // families without samples are not exposed
        assert!(!text.contains("redfish_chassis_power_voltage_volts"));
    }

    #[test]
    fn test_invalid_counter_value_is_skipped() {
        let catalog = Catalog::new();
        let samples = vec![sample(
            NETWORK_ADAPTER_TX_BYTES,
            f64::NAN,
            &["network_adapter", "1", "NIC 1", "A"],
            MetricKind::Counter,
        )];
        let text = render(&catalog.describe(), &samples, None).unwrap();
        assert!(!text.contains("tx_bytes{"));
    }
}
