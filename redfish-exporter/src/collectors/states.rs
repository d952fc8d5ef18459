//! Fixed numeric encoding of Redfish health and state enumerations.
//!
//! The numbers are part of the exported metric contract: dashboards and alert
//! rules compare against them, so they must never be renumbered.
//!
//! | Health   | value |   | State              | value |
//! |----------|-------|---|--------------------|-------|
//! | OK       | 1     |   | Enabled            | 1     |
//! | Warning  | 2     |   | Disabled           | 2     |
//! | Critical | 3     |   | StandbyOffline     | 3     |
//! |          |       |   | StandbySpare       | 4     |
//! |          |       |   | InTest             | 5     |
//! |          |       |   | Starting           | 6     |
//! |          |       |   | Absent             | 7     |
//! |          |       |   | UnavailableOffline | 8     |
//! |          |       |   | Deferring          | 9     |
//! |          |       |   | Quiesced           | 10    |
//! |          |       |   | Updating           | 11    |
//!
//! Anything else maps to `None` and the caller skips the sample.

use crate::redfish::models::{Health, State};

pub const HEALTH_HELP: &str = "1(OK),2(Warning),3(Critical)";
pub const STATE_HELP: &str = "1(Enabled),2(Disabled),3(StandbyOffline),4(StandbySpare),5(InTest),6(Starting),7(Absent),8(UnavailableOffline),9(Deferring),10(Quiesced),11(Updating)";

pub fn health_to_value(health: Option<&Health>) -> Option<f64> {
    match health? {
        Health::Ok => Some(1.0),
        Health::Warning => Some(2.0),
        Health::Critical => Some(3.0),
        Health::Unknown(_) => None,
    }
}

pub fn state_to_value(state: Option<&State>) -> Option<f64> {
    let value = match state? {
        State::Enabled => 1.0,
        State::Disabled => 2.0,
        State::StandbyOffline => 3.0,
        State::StandbySpare => 4.0,
        State::InTest => 5.0,
        State::Starting => 6.0,
        State::Absent => 7.0,
        State::UnavailableOffline => 8.0,
        State::Deferring => 9.0,
        State::Quiesced => 10.0,
        State::Updating => 11.0,
        State::Unknown(_) => return None,
    };
    Some(value)
}

pub fn health_help(component: &str) -> String {
    format!("health of {component},{HEALTH_HELP}")
}

pub fn state_help(component: &str) -> String {
    format!("state of {component},{STATE_HELP}")
}
