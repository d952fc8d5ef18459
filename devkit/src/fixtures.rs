/*!
Ready-made device records

Values are chosen so the mapped metrics are easy to assert on:
health OK (1), state Enabled (1), round readings.
*/

use redfish_exporter::redfish::models::*;

pub fn ok_status() -> Status {
    Status::new(Some("OK"), Some("Enabled"))
}

pub fn chassis(id: &str) -> Chassis {
    Chassis {
        id: id.to_string(),
        name: format!("Chassis {id}"),
        status: ok_status(),
        manufacturer: "Contoso".into(),
        model: "3500RX".into(),
        part_number: "224071-J23".into(),
        sku: "8675309".into(),
        links: ChassisLinks {
            thermal: Some(format!("/redfish/v1/Chassis/{id}/Thermal")),
            power: Some(format!("/redfish/v1/Chassis/{id}/Power")),
            network_adapters: Some(format!("/redfish/v1/Chassis/{id}/NetworkAdapters")),
        },
    }
}

/// Two temperature sensors and one RPM fan
pub fn thermal() -> Thermal {
    Thermal {
        name: "Thermal".into(),
        temperatures: vec![
            Temperature {
                member_id: "0".into(),
                name: "CPU1 Temp".into(),
                reading_celsius: 41.0,
                status: ok_status(),
            },
            Temperature {
                member_id: "1".into(),
                name: "Inlet Temp".into(),
                reading_celsius: 22.0,
                status: ok_status(),
            },
        ],
        fans: vec![Fan {
            member_id: "0".into(),
            name: "Fan 1".into(),
            reading: 3000.0,
            reading_units: ReadingUnits::Rpm,
            min_reading_range: 0.0,
            max_reading_range: 12000.0,
            lower_threshold_critical: 500.0,
            status: ok_status(),
            ..Default::default()
        }],
    }
}

pub fn power() -> Power {
    Power {
        voltages: vec![Voltage {
            member_id: "0".into(),
            name: "VRM1 Voltage".into(),
            reading_volts: 12.0,
            status: ok_status(),
        }],
        power_control: vec![PowerControl {
            member_id: "0".into(),
            name: "System Power Control".into(),
            average_consumed_watts: 319.0,
        }],
        power_supplies: vec![PowerSupply {
            member_id: "0".into(),
            name: "Power Supply 1".into(),
            power_input_watts: 344.0,
            power_output_watts: 319.0,
            efficiency_percent: 92.0,
            power_capacity_watts: 800.0,
            last_power_output_watts: 325.0,
            status: ok_status(),
        }],
    }
}

pub fn adapter(id: &str) -> NetworkAdapter {
    NetworkAdapter {
        id: id.to_string(),
        name: format!("Adapter {id}"),
        status: ok_status(),
        metrics: Some(AdapterMetrics {
            tx_bytes: 1_048_576,
            rx_bytes: 2_097_152,
        }),
        ports_link: Some(format!("/redfish/v1/Chassis/1/NetworkAdapters/{id}/NetworkPorts")),
    }
}

pub fn port(id: &str, link_up: bool) -> NetworkPort {
    NetworkPort {
        id: id.to_string(),
        name: format!("Port {id}"),
        status: ok_status(),
        link_up,
        link_speed_mbps: 10_000,
        link_technology: "Ethernet".into(),
        physical_port_number: id.to_string(),
    }
}
