/*!
# Redfish DevKit - test doubles for the exporter

- `stub_device`: scripted [`DeviceClient`](redfish_exporter::redfish::DeviceClient) with call recording
- `fake_bmc`: in-process HTTP server speaking enough Redfish for the real client
- `fixtures`: ready-made chassis, thermal, power and network records
- `test_utils`: tracing capture and sample assertions
*/

pub mod fake_bmc;
pub mod fixtures;
pub mod stub_device;
pub mod test_utils;

pub use fake_bmc::FakeBmc;
pub use stub_device::{Reply, StubDevice};
pub use test_utils::{LogCapture, SampleSet};
