//! Fan sub-collector, driven by the thermal collector's document.
//!
//! BMCs report fan speed either in RPM or as a percentage of the maximum
//! reading range. Both forms are derived so every fan exposes `fan_rpm` and
//! `fan_rpm_percentage`, alongside the raw range and thresholds.

use tracing::debug;

use crate::collectors::catalog::*;
use crate::collectors::{emit_status, label_values, SampleSink};
use crate::redfish::models::{Chassis, Fan, ReadingUnits, Thermal};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanSpeed {
    pub rpm: f64,
    pub percentage: f64,
}

/// Derive RPM and percentage from a single reading.
///
/// With a zero maximum range the percentage of an RPM reading is undefined
/// and reported as NaN.
pub fn fan_speed(reading: f64, max_range: f64, units: &ReadingUnits) -> FanSpeed {
    match units {
        ReadingUnits::Percent => FanSpeed {
            rpm: reading * max_range / 100.0,
            percentage: reading,
        },
        _ => FanSpeed {
            rpm: reading,
            percentage: if max_range > 0.0 {
                reading / max_range * 100.0
            } else {
                f64::NAN
            },
        },
    }
}

pub fn collect_fans(chassis: &Chassis, thermal: &Thermal, sink: &SampleSink) {
    debug!(chassis_id = %chassis.id, fans = thermal.fans.len(), "Collecting fan metrics");
    for fan in &thermal.fans {
        collect_fan(chassis, fan, sink);
    }
}

fn collect_fan(chassis: &Chassis, fan: &Fan, sink: &SampleSink) {
    let unit = fan.reading_units.label();
    let labels = label_values(&["fan", &chassis.id, &fan.name, &fan.member_id, &unit]);

    emit_status(sink, FAN_HEALTH, FAN_STATE, &fan.status, &labels);

    let speed = fan_speed(fan.reading, fan.max_reading_range, &fan.reading_units);
    sink.emit(FAN_RPM, speed.rpm, &labels);
    sink.emit(FAN_RPM_PERCENTAGE, speed.percentage, &labels);

    for (key, value) in [
        (FAN_RPM_MIN, fan.min_reading_range),
        (FAN_RPM_MAX, fan.max_reading_range),
        (FAN_RPM_LOWER_NON_CRITICAL, fan.lower_threshold_non_critical),
        (FAN_RPM_LOWER_CRITICAL, fan.lower_threshold_critical),
        (FAN_RPM_LOWER_FATAL, fan.lower_threshold_fatal),
        (FAN_RPM_UPPER_NON_CRITICAL, fan.upper_threshold_non_critical),
        (FAN_RPM_UPPER_CRITICAL, fan.upper_threshold_critical),
        (FAN_RPM_UPPER_FATAL, fan.upper_threshold_fatal),
    ] {
        sink.emit(key, value, &labels);
    }
}
