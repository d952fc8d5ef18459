//! HTTP routes, driven through the router without a socket

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use redfish_devkit::fixtures;
use redfish_devkit::{Reply, StubDevice};
use redfish_exporter::collectors::{Catalog, ChassisCollector, CollectorOptions};
use redfish_exporter::exposition::{MetricsExporter, CONTENT_TYPE};
use redfish_exporter::http::{build_router, AppState};

fn router(stub: StubDevice) -> axum::Router {
    let collector = ChassisCollector::new(
        Arc::new(stub),
        Arc::new(Catalog::new()),
        CollectorOptions::default(),
    );
    let exporter = Arc::new(MetricsExporter::new(Arc::new(collector)));
    build_router(AppState { exporter })
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let stub = StubDevice::new()
        .with_chassis(vec![fixtures::chassis("1")])
        .with_thermal("1", Reply::Data(fixtures::thermal()));

    let (status, content_type, body) = get(router(stub), "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(CONTENT_TYPE));
    assert!(body.contains("# HELP redfish_chassis_health"));
    let health = body
        .lines()
        .find(|l| l.starts_with("redfish_chassis_health{"))
        .unwrap();
    assert!(health.contains(r#"chassis_id="1""#));
    assert!(health.contains(r#"resource="chassis""#));
    assert!(health.ends_with(" 1"));
    assert!(body.contains("redfish_chassis_temperature_celsius{"));
    assert!(body.contains(r#"redfish_collector_scrape_status{collector="chassis"} 1"#));
}

#[tokio::test]
async fn test_metrics_on_discovery_failure() {
    let (status, _, body) = get(router(StubDevice::new().failing_discovery(500)), "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"redfish_collector_scrape_status{collector="chassis"} 0"#));
    assert!(!body.contains("redfish_chassis_health{"));
}

#[tokio::test]
async fn test_healthz() {
    let (status, _, body) = get(router(StubDevice::new()), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_landing_page_links_metrics() {
    let (status, content_type, body) = get(router(StubDevice::new()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(body.contains(r#"href="/metrics""#));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _, _) = get(router(StubDevice::new()), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
