//! Redfish HTTP client against the in-process fake BMC

use axum::http::Method;
use redfish_devkit::fake_bmc::{self, Auth, FakeBmc};
use redfish_exporter::redfish::models::{Health, ReadingUnits, State};
use redfish_exporter::redfish::{ClientError, DeviceClient, RedfishClient};
use serde_json::json;

#[tokio::test]
async fn test_session_login_and_discovery() {
    let bmc = FakeBmc::standard().await.unwrap();
    let client = RedfishClient::connect(&bmc.host_config(false)).await.unwrap();
    assert!(bmc.session_open());

    let chassis = client.list_chassis().await.unwrap();
    assert_eq!(chassis.len(), 1);
    assert_eq!(chassis[0].id, "1");
    assert_eq!(chassis[0].sku, "8675309");
    assert_eq!(chassis[0].status.health, Some(Health::Ok));

    let authed: Vec<_> = bmc
        .requests()
        .into_iter()
        .filter(|r| r.path == "/redfish/v1/Chassis/1")
        .collect();
    assert_eq!(authed.len(), 1);
    assert_eq!(authed[0].auth, Auth::Token);
}

#[tokio::test]
async fn test_basic_auth_skips_session() {
    let bmc = FakeBmc::standard().await.unwrap();
    let client = RedfishClient::connect(&bmc.host_config(true)).await.unwrap();

    client.list_chassis().await.unwrap();

    assert!(!bmc.session_open());
    assert!(bmc.requests().iter().all(|r| r.method != Method::POST));
    assert!(bmc
        .requests()
        .iter()
        .filter(|r| r.path.starts_with("/redfish/v1/Chassis"))
        .all(|r| r.auth == Auth::Basic));
}

#[tokio::test]
async fn test_bad_credentials_fail_connect() {
    let bmc = FakeBmc::standard().await.unwrap();
    let mut config = bmc.host_config(false);
    config.password = "wrong".into();

    let err = RedfishClient::connect(&config).await.err().unwrap();
    assert!(matches!(err, ClientError::Auth(_)));
}

#[tokio::test]
async fn test_subsystems_are_mapped() {
    let bmc = FakeBmc::standard().await.unwrap();
    let client = RedfishClient::connect(&bmc.host_config(false)).await.unwrap();
    let chassis = client.list_chassis().await.unwrap().remove(0);

    let thermal = client.thermal(&chassis).await.unwrap().unwrap();
    assert_eq!(thermal.temperatures[0].reading_celsius, 41.0);
    assert_eq!(thermal.fans[0].name, "Fan 1");
    assert_eq!(thermal.fans[0].reading_units, ReadingUnits::Percent);
    assert_eq!(thermal.fans[0].status.health, Some(Health::Warning));

    let power = client.power(&chassis).await.unwrap().unwrap();
    assert_eq!(power.power_control[0].average_consumed_watts, 319.0);

    let adapters = client.network_adapters(&chassis).await.unwrap().unwrap();
    assert_eq!(adapters.len(), 1);
    let metrics = adapters[0].metrics.unwrap();
    assert_eq!((metrics.tx_bytes, metrics.rx_bytes), (1000, 2000));

    let ports = client.network_ports(&adapters[0]).await.unwrap().unwrap();
    assert_eq!(ports.len(), 2);
    let down = ports.iter().find(|p| p.id == "2").unwrap();
    assert!(!down.link_up);
    assert_eq!(down.status.state, Some(State::StandbyOffline));
}

#[tokio::test]
async fn test_missing_document_is_absent() {
    let bmc = FakeBmc::standard().await.unwrap();
    bmc.remove_document("/redfish/v1/Chassis/1/Power");
    let client = RedfishClient::connect(&bmc.host_config(false)).await.unwrap();
    let chassis = client.list_chassis().await.unwrap().remove(0);

    assert!(client.power(&chassis).await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_link_is_absent() {
    let bmc = FakeBmc::standard().await.unwrap();
    bmc.set_document(
        "/redfish/v1/Chassis/1",
        json!({ "Id": "1", "Name": "Bare Chassis" }),
    );
    let client = RedfishClient::connect(&bmc.host_config(false)).await.unwrap();
    let chassis = client.list_chassis().await.unwrap().remove(0);

    assert!(client.thermal(&chassis).await.unwrap().is_none());
    assert!(client.network_adapters(&chassis).await.unwrap().is_none());
    assert!(chassis.status.health.is_none());
}

#[tokio::test]
async fn test_malformed_document_is_an_error() {
    let bmc = FakeBmc::standard().await.unwrap();
    bmc.set_document("/redfish/v1/Chassis/1/Thermal", json!({ "Temperatures": "nope" }));
    let client = RedfishClient::connect(&bmc.host_config(false)).await.unwrap();
    let chassis = client.list_chassis().await.unwrap().remove(0);

    let err = client.thermal(&chassis).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn test_logout_deletes_session() {
    let bmc = FakeBmc::standard().await.unwrap();
    let client = RedfishClient::connect(&bmc.host_config(false)).await.unwrap();

    client.logout().await;

    assert!(!bmc.session_open());
    assert!(bmc
        .requests()
        .iter()
        .any(|r| r.method == Method::DELETE && r.path == format!("{}/1", fake_bmc::SESSIONS_PATH)));
}
