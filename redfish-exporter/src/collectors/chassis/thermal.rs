use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::fan;
use crate::collectors::catalog::{TEMP_CELSIUS, TEMP_SENSOR_HEALTH, TEMP_SENSOR_STATE};
use crate::collectors::{emit_status, label_values, SampleSink, ScrapeContext, SubsystemCollector};
use crate::redfish::models::{Chassis, Thermal};

/// Temperature sensors, then fans from the same thermal document
pub struct ThermalCollector;

#[async_trait]
impl SubsystemCollector for ThermalCollector {
    fn name(&self) -> &'static str {
        "thermal"
    }

    async fn collect(&self, ctx: &ScrapeContext, chassis: &Chassis, sink: &SampleSink) {
        let thermal = match ctx.fetch(ctx.client.thermal(chassis)).await {
            Ok(Some(thermal)) => thermal,
            Ok(None) => {
                warn!(chassis_id = %chassis.id, "No thermal information for chassis");
                return;
            }
            Err(e) => {
                error!(chassis_id = %chassis.id, error = %e, "Failed to get thermal information for chassis");
                return;
            }
        };

        collect_temperatures(chassis, &thermal, sink);
        fan::collect_fans(chassis, &thermal, sink);
    }
}

fn collect_temperatures(chassis: &Chassis, thermal: &Thermal, sink: &SampleSink) {
    for sensor in &thermal.temperatures {
        debug!(chassis_id = %chassis.id, sensor_id = %sensor.member_id, "Collecting thermal sensor metrics");
        // some BMCs leave sensor names blank; fall back to the thermal resource name
        let name = if sensor.name.is_empty() { &thermal.name } else { &sensor.name };
        let labels = label_values(&["temperature", &chassis.id, name, &sensor.member_id]);

        emit_status(sink, TEMP_SENSOR_HEALTH, TEMP_SENSOR_STATE, &sensor.status, &labels);
        sink.emit(TEMP_CELSIUS, sensor.reading_celsius, &labels);
    }
}
