//! Redfish JSON documents as served by the BMC.
//!
//! Only the fields the exporter reads are modelled. Vendors routinely send
//! `null` for numbers they do not support, so every reading is an `Option`.

use serde::{Deserialize, Deserializer};

use super::models;

/// Missing and `null` both become the type's default
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct Link {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Status {
    pub health: Option<String>,
    pub state: Option<String>,
}

impl From<Status> for models::Status {
    fn from(status: Status) -> Self {
        models::Status::new(status.health.as_deref(), status.state.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRoot {
    pub chassis: Option<Link>,
    #[serde(default, deserialize_with = "null_default")]
    pub links: ServiceRootLinks,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRootLinks {
    pub sessions: Option<Link>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Collection {
    #[serde(default, deserialize_with = "null_default")]
    pub members: Vec<Link>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Chassis {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: Status,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub part_number: Option<String>,
    #[serde(rename = "SKU")]
    pub sku: Option<String>,
    pub thermal: Option<Link>,
    pub power: Option<Link>,
    pub network_adapters: Option<Link>,
}

impl From<Chassis> for models::Chassis {
    fn from(c: Chassis) -> Self {
        models::Chassis {
            id: c.id,
            name: c.name,
            status: c.status.into(),
            manufacturer: c.manufacturer.unwrap_or_default(),
            model: c.model.unwrap_or_default(),
            part_number: c.part_number.unwrap_or_default(),
            sku: c.sku.unwrap_or_default(),
            links: models::ChassisLinks {
                thermal: c.thermal.map(|l| l.odata_id),
                power: c.power.map(|l| l.odata_id),
                network_adapters: c.network_adapters.map(|l| l.odata_id),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Thermal {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub temperatures: Vec<Temperature>,
    #[serde(default, deserialize_with = "null_default")]
    pub fans: Vec<Fan>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Temperature {
    #[serde(default, deserialize_with = "null_default")]
    pub member_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    pub reading_celsius: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: Status,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Fan {
    #[serde(default, deserialize_with = "null_default")]
    pub member_id: String,
    // pre-2017 schemas name fans with FanName
    #[serde(default, alias = "FanName", deserialize_with = "null_default")]
    pub name: String,
    pub reading: Option<f64>,
    pub reading_units: Option<String>,
    pub min_reading_range: Option<f64>,
    pub max_reading_range: Option<f64>,
    pub lower_threshold_non_critical: Option<f64>,
    pub lower_threshold_critical: Option<f64>,
    pub lower_threshold_fatal: Option<f64>,
    pub upper_threshold_non_critical: Option<f64>,
    pub upper_threshold_critical: Option<f64>,
    pub upper_threshold_fatal: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: Status,
}

impl From<Thermal> for models::Thermal {
    fn from(t: Thermal) -> Self {
        let temperatures = t
            .temperatures
            .into_iter()
            .map(|s| models::Temperature {
                member_id: s.member_id,
                name: s.name,
                reading_celsius: s.reading_celsius.unwrap_or_default(),
                status: s.status.into(),
            })
            .collect();
        let fans = t
            .fans
            .into_iter()
            .map(|f| models::Fan {
                member_id: f.member_id,
                name: f.name,
                reading: f.reading.unwrap_or_default(),
                reading_units: f
                    .reading_units
                    .as_deref()
                    .map(models::ReadingUnits::from)
                    .unwrap_or_default(),
                min_reading_range: f.min_reading_range.unwrap_or_default(),
                max_reading_range: f.max_reading_range.unwrap_or_default(),
                lower_threshold_non_critical: f.lower_threshold_non_critical.unwrap_or_default(),
                lower_threshold_critical: f.lower_threshold_critical.unwrap_or_default(),
                lower_threshold_fatal: f.lower_threshold_fatal.unwrap_or_default(),
                upper_threshold_non_critical: f.upper_threshold_non_critical.unwrap_or_default(),
                upper_threshold_critical: f.upper_threshold_critical.unwrap_or_default(),
                upper_threshold_fatal: f.upper_threshold_fatal.unwrap_or_default(),
                status: f.status.into(),
            })
            .collect();
        models::Thermal {
            name: t.name,
            temperatures,
            fans,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Power {
    #[serde(default, deserialize_with = "null_default")]
    pub voltages: Vec<Voltage>,
    #[serde(default, deserialize_with = "null_default")]
    pub power_control: Vec<PowerControl>,
    #[serde(default, deserialize_with = "null_default")]
    pub power_supplies: Vec<PowerSupply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Voltage {
    #[serde(default, deserialize_with = "null_default")]
    pub member_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    pub reading_volts: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: Status,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PowerControl {
    #[serde(default, deserialize_with = "null_default")]
    pub member_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    pub power_metrics: Option<PowerMetrics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PowerMetrics {
    pub average_consumed_watts: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PowerSupply {
    #[serde(default, deserialize_with = "null_default")]
    pub member_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    pub power_input_watts: Option<f64>,
    pub power_output_watts: Option<f64>,
    pub efficiency_percent: Option<f64>,
    pub power_capacity_watts: Option<f64>,
    pub last_power_output_watts: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: Status,
}

impl From<Power> for models::Power {
    fn from(p: Power) -> Self {
        models::Power {
            voltages: p
                .voltages
                .into_iter()
                .map(|v| models::Voltage {
                    member_id: v.member_id,
                    name: v.name,
                    reading_volts: v.reading_volts.unwrap_or_default(),
                    status: v.status.into(),
                })
                .collect(),
            power_control: p
                .power_control
                .into_iter()
                .map(|c| models::PowerControl {
                    member_id: c.member_id,
                    name: c.name,
                    average_consumed_watts: c
                        .power_metrics
                        .and_then(|m| m.average_consumed_watts)
                        .unwrap_or_default(),
                })
                .collect(),
            power_supplies: p
                .power_supplies
                .into_iter()
                .map(|s| models::PowerSupply {
                    member_id: s.member_id,
                    name: s.name,
                    power_input_watts: s.power_input_watts.unwrap_or_default(),
                    power_output_watts: s.power_output_watts.unwrap_or_default(),
                    efficiency_percent: s.efficiency_percent.unwrap_or_default(),
                    power_capacity_watts: s.power_capacity_watts.unwrap_or_default(),
                    last_power_output_watts: s.last_power_output_watts.unwrap_or_default(),
                    status: s.status.into(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkAdapter {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: Status,
    pub metrics: Option<Link>,
    pub network_ports: Option<Link>,
    pub ports: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub struct AdapterMetrics {
    #[serde(rename = "TXBytes")]
    pub tx_bytes: Option<u64>,
    #[serde(rename = "RXBytes")]
    pub rx_bytes: Option<u64>,
}

impl From<AdapterMetrics> for models::AdapterMetrics {
    fn from(m: AdapterMetrics) -> Self {
        models::AdapterMetrics {
            tx_bytes: m.tx_bytes.unwrap_or_default(),
            rx_bytes: m.rx_bytes.unwrap_or_default(),
        }
    }
}

impl NetworkAdapter {
    /// Map into the internal record; metrics are fetched separately.
    pub fn into_model(self, metrics: Option<models::AdapterMetrics>) -> models::NetworkAdapter {
        models::NetworkAdapter {
            id: self.id,
            name: self.name,
            status: self.status.into(),
            metrics,
            ports_link: self
                .network_ports
                .or(self.ports)
                .map(|l| l.odata_id),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkPort {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: Status,
    pub link_status: Option<String>,
    pub current_link_speed_mbps: Option<u64>,
    // newer Port schema reports Gbps instead
    pub current_speed_gbps: Option<f64>,
    pub active_link_technology: Option<String>,
    pub link_network_technology: Option<String>,
    pub physical_port_number: Option<String>,
    pub port_id: Option<String>,
}

impl From<NetworkPort> for models::NetworkPort {
    fn from(p: NetworkPort) -> Self {
        let link_up = matches!(p.link_status.as_deref(), Some("Up") | Some("LinkUp"));
        let link_speed_mbps = p
            .current_link_speed_mbps
            .or_else(|| p.current_speed_gbps.map(|g| (g * 1000.0).round() as u64))
            .unwrap_or_default();
        models::NetworkPort {
            id: p.id,
            name: p.name,
            status: p.status.into(),
            link_up,
            link_speed_mbps,
            link_technology: p
                .active_link_technology
                .or(p.link_network_technology)
                .unwrap_or_default(),
            physical_port_number: p.physical_port_number.or(p.port_id).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redfish::models::{Health, ReadingUnits, State};

    #[test]
    fn test_chassis_mapping() {
        let doc = serde_json::json!({
            "@odata.id": "/redfish/v1/Chassis/1",
            "Id": "1",
            "Name": "Computer System Chassis",
            "Status": { "Health": "OK", "State": "Enabled" },
            "Manufacturer": "Contoso",
            "Model": "3500RX",
            "SKU": "8675309",
            "Thermal": { "@odata.id": "/redfish/v1/Chassis/1/Thermal" },
            "Power": { "@odata.id": "/redfish/v1/Chassis/1/Power" }
        });
        let chassis: models::Chassis = serde_json::from_value::<Chassis>(doc).unwrap().into();

        assert_eq!(chassis.id, "1");
        assert_eq!(chassis.status.health, Some(Health::Ok));
        assert_eq!(chassis.status.state, Some(State::Enabled));
        assert_eq!(chassis.sku, "8675309");
        assert_eq!(chassis.part_number, "");
        assert_eq!(chassis.links.thermal.as_deref(), Some("/redfish/v1/Chassis/1/Thermal"));
        assert!(chassis.links.network_adapters.is_none());
    }

    #[test]
    fn test_thermal_nulls_become_zero() {
        let doc = serde_json::json!({
            "Name": "Thermal",
            "Temperatures": [
                { "MemberId": "0", "Name": "CPU1 Temp", "ReadingCelsius": 41, "Status": { "State": "Enabled" } }
            ],
            "Fans": [
                {
                    "MemberId": "0",
                    "FanName": "System Fan 1",
                    "Reading": 40,
                    "ReadingUnits": "Percent",
                    "MaxReadingRange": 12000,
                    "LowerThresholdCritical": null,
                    "Status": { "Health": "Warning" }
                }
            ]
        });
        let thermal: models::Thermal = serde_json::from_value::<Thermal>(doc).unwrap().into();

        assert_eq!(thermal.temperatures[0].reading_celsius, 41.0);
        assert_eq!(thermal.temperatures[0].status.health, None);
        let fan = &thermal.fans[0];
        assert_eq!(fan.name, "System Fan 1");
        assert_eq!(fan.reading_units, ReadingUnits::Percent);
        assert_eq!(fan.max_reading_range, 12000.0);
        assert_eq!(fan.lower_threshold_critical, 0.0);
    }

    #[test]
    fn test_power_control_metrics_flattened() {
        let doc = serde_json::json!({
            "PowerControl": [
                { "MemberId": "0", "Name": "System Power Control", "PowerMetrics": { "AverageConsumedWatts": 319 } }
            ],
            "PowerSupplies": [
                { "MemberId": "0", "Name": "PSU1", "PowerInputWatts": 420.5, "EfficiencyPercent": 94 }
            ]
        });
        let power: models::Power = serde_json::from_value::<Power>(doc).unwrap().into();

        assert!(power.voltages.is_empty());
        assert_eq!(power.power_control[0].average_consumed_watts, 319.0);
        assert_eq!(power.power_supplies[0].power_input_watts, 420.5);
        assert_eq!(power.power_supplies[0].power_output_watts, 0.0);
    }

    #[test]
    fn test_port_schema_variants() {
        let legacy: models::NetworkPort = serde_json::from_value::<NetworkPort>(serde_json::json!({
            "Id": "1", "Name": "Port 1", "LinkStatus": "Up",
            "CurrentLinkSpeedMbps": 10000, "ActiveLinkTechnology": "Ethernet",
            "PhysicalPortNumber": "1"
        }))
        .unwrap()
        .into();
        assert!(legacy.link_up);
        assert_eq!(legacy.link_speed_mbps, 10000);

        let modern: models::NetworkPort = serde_json::from_value::<NetworkPort>(serde_json::json!({
            "Id": "2", "LinkStatus": "LinkDown", "CurrentSpeedGbps": 25,
            "LinkNetworkTechnology": "Ethernet", "PortId": "2"
        }))
        .unwrap()
        .into();
        assert!(!modern.link_up);
        assert_eq!(modern.link_speed_mbps, 25000);
        assert_eq!(modern.link_technology, "Ethernet");
        assert_eq!(modern.physical_port_number, "2");
    }

    #[test]
    fn test_null_strings_and_status_fall_back_to_defaults() {
        let chassis: models::Chassis = serde_json::from_value::<Chassis>(serde_json::json!({
            "Id": "1", "Name": null, "Status": null, "Manufacturer": null
        }))
        .unwrap()
        .into();
        assert_eq!(chassis.name, "");
        assert_eq!(chassis.status, models::Status::default());
        assert_eq!(chassis.manufacturer, "");

        let thermal: models::Thermal = serde_json::from_value::<Thermal>(serde_json::json!({
            "Name": null,
            "Temperatures": [
                { "MemberId": null, "Name": null, "ReadingCelsius": 30, "Status": null }
            ],
            "Fans": null
        }))
        .unwrap()
        .into();
        assert_eq!(thermal.temperatures.len(), 1);
        assert_eq!(thermal.temperatures[0].name, "");
        assert_eq!(thermal.temperatures[0].reading_celsius, 30.0);
        assert!(thermal.fans.is_empty());

        let power: models::Power = serde_json::from_value::<Power>(serde_json::json!({
            "Voltages": [{ "MemberId": "0", "Name": null, "ReadingVolts": 12, "Status": null }],
            "PowerSupplies": [{ "MemberId": "0", "Name": "PSU1", "PowerInputWatts": 400, "Status": null }]
        }))
        .unwrap()
        .into();
        assert_eq!(power.voltages[0].reading_volts, 12.0);
        assert_eq!(power.power_supplies[0].status, models::Status::default());

        let port: models::NetworkPort = serde_json::from_value::<NetworkPort>(serde_json::json!({
            "Id": "1", "Name": null, "Status": null, "LinkStatus": "Up",
            "PhysicalPortNumber": null, "ActiveLinkTechnology": null
        }))
        .unwrap()
        .into();
        assert!(port.link_up);
        assert_eq!(port.physical_port_number, "");
        assert_eq!(port.link_technology, "");
    }

    #[test]
    fn test_fan_without_units_is_unspecified() {
        let thermal: models::Thermal = serde_json::from_value::<Thermal>(serde_json::json!({
            "Fans": [{ "MemberId": "0", "Name": "Fan 1", "Reading": 3000, "ReadingUnits": null }]
        }))
        .unwrap()
        .into();
        assert_eq!(thermal.fans[0].reading_units, ReadingUnits::Unspecified);
        assert_eq!(thermal.fans[0].reading_units.label(), "");
    }
}
