//! Metric catalog: every descriptor the exporter can emit.
//!
//! Built once at startup and shared read-only. Names follow
//! `<namespace>_<subsystem>_<metric>`; label order is fixed here and every
//! sample must supply values in exactly this order.

use std::collections::BTreeMap;

use super::states::{health_help, state_help};

pub const NAMESPACE: &str = "redfish";
pub const SUBSYSTEM: &str = "chassis";

pub const BASE_LABELS: &[&str] = &["resource", "chassis_id"];
pub const MODEL_LABELS: &[&str] = &["manufacturer", "model", "part_number", "sku"];
pub const TEMP_SENSOR_LABELS: &[&str] = &["sensor", "sensor_id"];
pub const FAN_LABELS: &[&str] = &["fan", "fan_id", "fan_unit"];
pub const POWER_LABELS: &[&str] = &["name", "member_id"];
pub const NETWORK_ADAPTER_LABELS: &[&str] = &["network_adapter", "network_adapter_id"];
pub const NETWORK_PORT_LABELS: &[&str] = &[
    "network_port",
    "network_port_id",
    "network_port_speed",
    "network_port_connection_type",
    "network_port_physical_number",
];

// basic
pub const HEALTH: &str = "health";
pub const STATE: &str = "state";
pub const MODEL_INFO: &str = "model_info";

// thermal
pub const TEMP_SENSOR_STATE: &str = "temperature_sensor_state";
pub const TEMP_SENSOR_HEALTH: &str = "temperature_sensor_health";
pub const TEMP_CELSIUS: &str = "temperature_celsius";

// fan
pub const FAN_STATE: &str = "fan_state";
pub const FAN_HEALTH: &str = "fan_health";
pub const FAN_RPM: &str = "fan_rpm";
pub const FAN_RPM_PERCENTAGE: &str = "fan_rpm_percentage";
pub const FAN_RPM_MIN: &str = "fan_rpm_min";
pub const FAN_RPM_MAX: &str = "fan_rpm_max";
pub const FAN_RPM_LOWER_NON_CRITICAL: &str = "fan_rpm_lower_threshold_non_critical";
pub const FAN_RPM_LOWER_CRITICAL: &str = "fan_rpm_lower_threshold_critical";
pub const FAN_RPM_LOWER_FATAL: &str = "fan_rpm_lower_threshold_fatal";
pub const FAN_RPM_UPPER_NON_CRITICAL: &str = "fan_rpm_upper_threshold_non_critical";
pub const FAN_RPM_UPPER_CRITICAL: &str = "fan_rpm_upper_threshold_critical";
pub const FAN_RPM_UPPER_FATAL: &str = "fan_rpm_upper_threshold_fatal";

// power
pub const POWER_VOLTAGE_STATE: &str = "power_voltage_state";
pub const POWER_VOLTAGE_HEALTH: &str = "power_voltage_health";
pub const POWER_VOLTAGE_VOLTS: &str = "power_voltage_volts";
pub const POWER_AVERAGE_CONSUMED_WATTS: &str = "power_average_consumed_watts";
pub const POWER_SUPPLY_STATE: &str = "power_power_supply_state";
pub const POWER_SUPPLY_HEALTH: &str = "power_power_supply_health";
pub const POWER_SUPPLY_INPUT_WATTS: &str = "power_power_supply_input_watts";
pub const POWER_SUPPLY_OUTPUT_WATTS: &str = "power_power_supply_output_watts";
pub const POWER_SUPPLY_EFFICIENCY_PERCENTAGE: &str = "power_power_supply_efficiency_percentage";
pub const POWER_SUPPLY_CAPACITY_WATTS: &str = "power_power_supply_power_capacity_watts";
pub const POWER_SUPPLY_LAST_OUTPUT_WATTS: &str = "power_power_supply_last_power_output_watts";

// network
pub const NETWORK_ADAPTER_STATE: &str = "network_adapter_state";
pub const NETWORK_ADAPTER_HEALTH: &str = "network_adapter_health";
pub const NETWORK_ADAPTER_TX_BYTES: &str = "network_adapter_tx_bytes";
pub const NETWORK_ADAPTER_RX_BYTES: &str = "network_adapter_rx_bytes";
pub const NETWORK_PORT_STATE: &str = "network_port_state";
pub const NETWORK_PORT_HEALTH: &str = "network_port_health";
pub const NETWORK_PORT_LINK_STATUS: &str = "network_port_link_status";

pub const SCRAPE_STATUS: &str = "collector_scrape_status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    /// Monotonic device counter; consumers should rate() it
    Counter,
}

/// Static metadata for one metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDesc {
    pub key: &'static str,
    pub name: String,
    pub help: String,
    pub labels: Vec<&'static str>,
    pub kind: MetricKind,
}

pub type MetricGroup = BTreeMap<&'static str, MetricDesc>;

/// Join non-empty parts with `_`
pub fn fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

fn desc(
    key: &'static str,
    help: impl Into<String>,
    label_sets: &[&[&'static str]],
    kind: MetricKind,
) -> (&'static str, MetricDesc) {
    let desc = MetricDesc {
        key,
        name: fq_name(NAMESPACE, SUBSYSTEM, key),
        help: help.into(),
        labels: label_sets.concat(),
        kind,
    };
    (key, desc)
}

fn gauge(key: &'static str, help: impl Into<String>, label_sets: &[&[&'static str]]) -> (&'static str, MetricDesc) {
    desc(key, help, label_sets, MetricKind::Gauge)
}

pub fn basic_metrics() -> MetricGroup {
    MetricGroup::from([
        gauge(HEALTH, health_help("chassis"), &[BASE_LABELS]),
        gauge(STATE, state_help("chassis"), &[BASE_LABELS]),
        gauge(
            MODEL_INFO,
            "organization responsible for producing the chassis, the name by which the manufacturer generally refers to the chassis, and a part number and sku assigned by the organization that is responsible for producing or manufacturing the chassis",
            &[BASE_LABELS, MODEL_LABELS],
        ),
    ])
}

pub fn thermal_metrics() -> MetricGroup {
    let labels: &[&[&str]] = &[BASE_LABELS, TEMP_SENSOR_LABELS];
    MetricGroup::from([
        gauge(TEMP_SENSOR_STATE, state_help("chassis.temperature_sensor"), labels),
        gauge(TEMP_SENSOR_HEALTH, health_help("chassis.temperature_sensor"), labels),
        gauge(TEMP_CELSIUS, "celsius temperature of the chassis component", labels),
    ])
}

pub fn fan_metrics() -> MetricGroup {
    let labels: &[&[&str]] = &[BASE_LABELS, FAN_LABELS];
    MetricGroup::from([
        gauge(FAN_STATE, state_help("chassis.fan"), labels),
        gauge(FAN_HEALTH, health_help("chassis.fan"), labels),
        gauge(FAN_RPM, "RPM of the fan", labels),
        gauge(
            FAN_RPM_PERCENTAGE,
            "Percentage of the fan's RPM compared to the minimum-maximum RPM",
            labels,
        ),
        gauge(FAN_RPM_MIN, "Minimum possible RPM of the fan", labels),
        gauge(FAN_RPM_MAX, "Maximum possible RPM of the fan", labels),
        gauge(
            FAN_RPM_LOWER_NON_CRITICAL,
            "threshold below the normal range that is not considered critical",
            labels,
        ),
        gauge(
            FAN_RPM_LOWER_CRITICAL,
            "threshold below the normal range that is not considered fatal",
            labels,
        ),
        gauge(
            FAN_RPM_LOWER_FATAL,
            "threshold below the normal range that is considered fatal",
            labels,
        ),
        gauge(
            FAN_RPM_UPPER_NON_CRITICAL,
            "threshold above the normal range that is not considered critical",
            labels,
        ),
        gauge(
            FAN_RPM_UPPER_CRITICAL,
            "threshold above the normal range that is not considered fatal",
            labels,
        ),
        gauge(
            FAN_RPM_UPPER_FATAL,
            "threshold above the normal range that is considered fatal",
            labels,
        ),
    ])
}

pub fn power_metrics() -> MetricGroup {
    let labels: &[&[&str]] = &[BASE_LABELS, POWER_LABELS];
    MetricGroup::from([
        gauge(POWER_VOLTAGE_STATE, state_help("chassis.power_voltage"), labels),
        gauge(POWER_VOLTAGE_HEALTH, health_help("chassis.power_voltage"), labels),
        gauge(POWER_VOLTAGE_VOLTS, "Voltage of the power supply", labels),
        gauge(POWER_AVERAGE_CONSUMED_WATTS, "Average power consumed in watts", labels),
        gauge(POWER_SUPPLY_STATE, state_help("chassis.power_supply"), labels),
        gauge(POWER_SUPPLY_HEALTH, health_help("chassis.power_supply"), labels),
        gauge(POWER_SUPPLY_INPUT_WATTS, "Power supply input watts", labels),
        gauge(POWER_SUPPLY_OUTPUT_WATTS, "Power supply output watts", labels),
        gauge(
            POWER_SUPPLY_EFFICIENCY_PERCENTAGE,
            "Power supply efficiency percentage",
            labels,
        ),
        gauge(POWER_SUPPLY_CAPACITY_WATTS, "Power supply power capacity watts", labels),
        gauge(
            POWER_SUPPLY_LAST_OUTPUT_WATTS,
            "Power supply last power output watts",
            labels,
        ),
    ])
}

pub fn network_metrics() -> MetricGroup {
    let adapter: &[&[&str]] = &[BASE_LABELS, NETWORK_ADAPTER_LABELS];
    let port: &[&[&str]] = &[BASE_LABELS, NETWORK_ADAPTER_LABELS, NETWORK_PORT_LABELS];
    MetricGroup::from([
        gauge(NETWORK_ADAPTER_STATE, state_help("chassis.network_adapter"), adapter),
        gauge(NETWORK_ADAPTER_HEALTH, health_help("chassis.network_adapter"), adapter),
        desc(
            NETWORK_ADAPTER_TX_BYTES,
            "Transmitted bytes of the network adapter",
            adapter,
            MetricKind::Counter,
        ),
        desc(
            NETWORK_ADAPTER_RX_BYTES,
            "Received bytes of the network adapter",
            adapter,
            MetricKind::Counter,
        ),
        gauge(NETWORK_PORT_STATE, state_help("chassis.network_port"), port),
        gauge(NETWORK_PORT_HEALTH, health_help("chassis.network_port"), port),
        gauge(NETWORK_PORT_LINK_STATUS, "Link status of the network port, 1(Up),0(otherwise)", port),
    ])
}

/// Every registered descriptor plus the scrape-status gauge
#[derive(Debug, Clone)]
pub struct Catalog {
    metrics: MetricGroup,
    scrape_status: MetricDesc,
}

impl Catalog {
    pub fn new() -> Self {
        let mut metrics = MetricGroup::new();
        for group in [
            basic_metrics(),
            thermal_metrics(),
            fan_metrics(),
            power_metrics(),
            network_metrics(),
        ] {
            metrics.extend(group);
        }
        let scrape_status = MetricDesc {
            key: SCRAPE_STATUS,
            name: fq_name(NAMESPACE, "", SCRAPE_STATUS),
            help: "1 if the collector's last scrape succeeded, 0 otherwise".to_string(),
            labels: vec!["collector"],
            kind: MetricKind::Gauge,
        };
        Self {
            metrics,
            scrape_status,
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetricDesc> {
        if key == SCRAPE_STATUS {
            return Some(&self.scrape_status);
        }
        self.metrics.get(key)
    }

    /// All descriptors, scrape status last
    pub fn describe(&self) -> Vec<&MetricDesc> {
        self.metrics
            .values()
            .chain(std::iter::once(&self.scrape_status))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.metrics.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fq_name() {
        assert_eq!(fq_name("redfish", "chassis", "health"), "redfish_chassis_health");
        assert_eq!(fq_name("redfish", "", "collector_scrape_status"), "redfish_collector_scrape_status");
    }

    #[test]
    fn test_groups_do_not_collide() {
        let total: usize = [
            basic_metrics(),
            thermal_metrics(),
            fan_metrics(),
            power_metrics(),
            network_metrics(),
        ]
        .iter()
        .map(|g| g.len())
        .sum();
        let catalog = Catalog::new();
        assert_eq!(catalog.len(), total + 1);
        assert_eq!(catalog.describe().len(), catalog.len());
    }

    #[test]
    fn test_label_schemas() {
        let catalog = Catalog::new();

        let fan = catalog.get(FAN_RPM).unwrap();
        assert_eq!(fan.name, "redfish_chassis_fan_rpm");
        assert_eq!(fan.labels, vec!["resource", "chassis_id", "fan", "fan_id", "fan_unit"]);

        let port = catalog.get(NETWORK_PORT_LINK_STATUS).unwrap();
        assert_eq!(
            port.labels,
            vec![
                "resource",
                "chassis_id",
                "network_adapter",
                "network_adapter_id",
                "network_port",
                "network_port_id",
                "network_port_speed",
                "network_port_connection_type",
                "network_port_physical_number",
            ]
        );

        let info = catalog.get(MODEL_INFO).unwrap();
        assert_eq!(info.labels.len(), 6);
    }

    #[test]
    fn test_counters_and_scrape_status() {
        let catalog = Catalog::new();
        assert_eq!(catalog.get(NETWORK_ADAPTER_TX_BYTES).unwrap().kind, MetricKind::Counter);
        assert_eq!(catalog.get(POWER_SUPPLY_INPUT_WATTS).unwrap().kind, MetricKind::Gauge);

        let status = catalog.get(SCRAPE_STATUS).unwrap();
        assert_eq!(status.name, "redfish_collector_scrape_status");
        assert_eq!(status.labels, vec!["collector"]);
        assert_eq!(catalog.describe().last().unwrap().key, SCRAPE_STATUS);
    }

    #[test]
    fn test_names_are_lower_snake_case() {
        for desc in Catalog::new().describe() {
            assert!(desc
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
            for label in &desc.labels {
                assert!(label.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
            }
        }
    }
}
