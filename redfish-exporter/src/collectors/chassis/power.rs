use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::collectors::catalog::*;
use crate::collectors::{emit_status, label_values, SampleSink, ScrapeContext, SubsystemCollector};
use crate::redfish::models::Chassis;

/// Voltage rails, power-control entries and power supplies
pub struct PowerCollector;

#[async_trait]
impl SubsystemCollector for PowerCollector {
    fn name(&self) -> &'static str {
        "power"
    }

    async fn collect(&self, ctx: &ScrapeContext, chassis: &Chassis, sink: &SampleSink) {
        debug!(chassis_id = %chassis.id, "Collecting power metrics");
        let power = match ctx.fetch(ctx.client.power(chassis)).await {
            Ok(Some(power)) => power,
            Ok(None) => {
                warn!(chassis_id = %chassis.id, "No power information for chassis");
                return;
            }
            Err(e) => {
                error!(chassis_id = %chassis.id, error = %e, "Failed to get power information for chassis");
                return;
            }
        };

        for voltage in &power.voltages {
            let labels = label_values(&["power_voltage", &chassis.id, &voltage.name, &voltage.member_id]);
            emit_status(sink, POWER_VOLTAGE_HEALTH, POWER_VOLTAGE_STATE, &voltage.status, &labels);
            sink.emit(POWER_VOLTAGE_VOLTS, voltage.reading_volts, &labels);
        }

        for control in &power.power_control {
            let labels = label_values(&["power_control", &chassis.id, &control.name, &control.member_id]);
            sink.emit(POWER_AVERAGE_CONSUMED_WATTS, control.average_consumed_watts, &labels);
        }

        for supply in &power.power_supplies {
            let labels = label_values(&["power_supply", &chassis.id, &supply.name, &supply.member_id]);
            emit_status(sink, POWER_SUPPLY_HEALTH, POWER_SUPPLY_STATE, &supply.status, &labels);
            sink.emit(POWER_SUPPLY_INPUT_WATTS, supply.power_input_watts, &labels);
            sink.emit(POWER_SUPPLY_OUTPUT_WATTS, supply.power_output_watts, &labels);
            sink.emit(POWER_SUPPLY_EFFICIENCY_PERCENTAGE, supply.efficiency_percent, &labels);
            sink.emit(POWER_SUPPLY_CAPACITY_WATTS, supply.power_capacity_watts, &labels);
            sink.emit(POWER_SUPPLY_LAST_OUTPUT_WATTS, supply.last_power_output_watts, &labels);
        }
    }
}
