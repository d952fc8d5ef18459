use async_trait::async_trait;
use tracing::debug;

use crate::collectors::catalog::{HEALTH, MODEL_INFO, STATE};
use crate::collectors::{emit_status, label_values, SampleSink, ScrapeContext, SubsystemCollector};
use crate::redfish::models::Chassis;

/// Chassis-level health, state and model info. Needs no extra fetch.
pub struct BasicCollector;

#[async_trait]
impl SubsystemCollector for BasicCollector {
    fn name(&self) -> &'static str {
        "basic"
    }

    async fn collect(&self, _ctx: &ScrapeContext, chassis: &Chassis, sink: &SampleSink) {
        debug!(chassis_id = %chassis.id, "Collecting basic chassis metrics");
        let labels = label_values(&["chassis", &chassis.id]);
        emit_status(sink, HEALTH, STATE, &chassis.status, &labels);

        let info_labels = label_values(&[
            "chassis",
            &chassis.id,
            &chassis.manufacturer,
            &chassis.model,
            &chassis.part_number,
            &chassis.sku,
        ]);
        sink.emit(MODEL_INFO, 1.0, &info_labels);
    }
}
