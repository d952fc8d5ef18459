//! Internal record shapes for everything the collectors read from a BMC.
//!
//! These are deliberately independent of the Redfish wire format: the client
//! maps JSON documents into them at the boundary, so schema drift between BMC
//! vendors stays inside `redfish::client`.

use std::fmt;

/// Severity reported in a Redfish `Status.Health` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Health {
    Ok,
    Warning,
    Critical,
    Unknown(String),
}

impl From<&str> for Health {
    fn from(value: &str) -> Self {
        match value {
            "OK" => Health::Ok,
            "Warning" => Health::Warning,
            "Critical" => Health::Critical,
            other => Health::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Health::Ok => f.write_str("OK"),
            Health::Warning => f.write_str("Warning"),
            Health::Critical => f.write_str("Critical"),
            Health::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Operational lifecycle reported in a Redfish `Status.State` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Enabled,
    Disabled,
    StandbyOffline,
    StandbySpare,
    InTest,
    Starting,
    Absent,
    UnavailableOffline,
    Deferring,
    Quiesced,
    Updating,
    Unknown(String),
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        match value {
            "Enabled" => State::Enabled,
            "Disabled" => State::Disabled,
            "StandbyOffline" => State::StandbyOffline,
            "StandbySpare" => State::StandbySpare,
            "InTest" => State::InTest,
            "Starting" => State::Starting,
            "Absent" => State::Absent,
            "UnavailableOffline" => State::UnavailableOffline,
            "Deferring" => State::Deferring,
            "Quiesced" => State::Quiesced,
            "Updating" => State::Updating,
            other => State::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Enabled => "Enabled",
            State::Disabled => "Disabled",
            State::StandbyOffline => "StandbyOffline",
            State::StandbySpare => "StandbySpare",
            State::InTest => "InTest",
            State::Starting => "Starting",
            State::Absent => "Absent",
            State::UnavailableOffline => "UnavailableOffline",
            State::Deferring => "Deferring",
            State::Quiesced => "Quiesced",
            State::Updating => "Updating",
            State::Unknown(raw) => raw,
        };
        f.write_str(name)
    }
}

/// Health and state pair carried by nearly every Redfish resource.
/// Either half may be missing on real hardware.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub health: Option<Health>,
    pub state: Option<State>,
}

impl Status {
    pub fn new(health: Option<&str>, state: Option<&str>) -> Self {
        Self {
            health: health.map(Health::from),
            state: state.map(State::from),
        }
    }
}

/// Navigation links of a chassis, resolved by the client only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChassisLinks {
    pub thermal: Option<String>,
    pub power: Option<String>,
    pub network_adapters: Option<String>,
}

/// A physical enclosure discovered on the BMC
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chassis {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub manufacturer: String,
    pub model: String,
    pub part_number: String,
    pub sku: String,
    pub links: ChassisLinks,
}

/// Thermal subsystem of one chassis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thermal {
    pub name: String,
    pub temperatures: Vec<Temperature>,
    pub fans: Vec<Fan>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Temperature {
    pub member_id: String,
    pub name: String,
    pub reading_celsius: f64,
    pub status: Status,
}

/// Unit a fan reports its `Reading` in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReadingUnits {
    Rpm,
    Percent,
    /// BMC did not report a unit; treated as RPM for the math
    #[default]
    Unspecified,
    Other(String),
}

impl From<&str> for ReadingUnits {
    fn from(value: &str) -> Self {
        match value {
            "RPM" => ReadingUnits::Rpm,
            "Percent" => ReadingUnits::Percent,
            "" => ReadingUnits::Unspecified,
            other => ReadingUnits::Other(other.to_string()),
        }
    }
}

impl ReadingUnits {
    /// Lower-case form used as the `fan_unit` label value
    pub fn label(&self) -> String {
        match self {
            ReadingUnits::Rpm => "rpm".to_string(),
            ReadingUnits::Percent => "percent".to_string(),
            ReadingUnits::Unspecified => String::new(),
            ReadingUnits::Other(raw) => raw.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fan {
    pub member_id: String,
    pub name: String,
    pub reading: f64,
    pub reading_units: ReadingUnits,
    pub min_reading_range: f64,
    pub max_reading_range: f64,
    pub lower_threshold_non_critical: f64,
    pub lower_threshold_critical: f64,
    pub lower_threshold_fatal: f64,
    pub upper_threshold_non_critical: f64,
    pub upper_threshold_critical: f64,
    pub upper_threshold_fatal: f64,
    pub status: Status,
}

/// Power subsystem of one chassis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Power {
    pub voltages: Vec<Voltage>,
    pub power_control: Vec<PowerControl>,
    pub power_supplies: Vec<PowerSupply>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Voltage {
    pub member_id: String,
    pub name: String,
    pub reading_volts: f64,
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerControl {
    pub member_id: String,
    pub name: String,
    pub average_consumed_watts: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerSupply {
    pub member_id: String,
    pub name: String,
    pub power_input_watts: f64,
    pub power_output_watts: f64,
    pub efficiency_percent: f64,
    pub power_capacity_watts: f64,
    pub last_power_output_watts: f64,
    pub status: Status,
}

/// Cumulative traffic counters of a network adapter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdapterMetrics {
    pub tx_bytes: u64,
    pub rx_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkAdapter {
    pub id: String,
    pub name: String,
    pub status: Status,
    /// `None` when the BMC exposes no metrics resource for the adapter
    pub metrics: Option<AdapterMetrics>,
    pub ports_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkPort {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub link_up: bool,
    pub link_speed_mbps: u64,
    pub link_technology: String,
    pub physical_port_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_parsing() {
        assert_eq!(Health::from("OK"), Health::Ok);
        assert_eq!(Health::from("Critical"), Health::Critical);
        assert_eq!(Health::from("ok"), Health::Unknown("ok".into()));
    }

    #[test]
    fn test_state_round_trips_through_display() {
        for raw in ["Enabled", "StandbySpare", "UnavailableOffline", "Updating", "Bogus"] {
            assert_eq!(State::from(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_reading_units_label() {
        assert_eq!(ReadingUnits::from("RPM").label(), "rpm");
        assert_eq!(ReadingUnits::from("Percent").label(), "percent");
        assert_eq!(ReadingUnits::from("Hz").label(), "hz");
        assert_eq!(ReadingUnits::from("").label(), "");
        assert_eq!(ReadingUnits::default(), ReadingUnits::Unspecified);
    }
}
