//! HTTP surface of the exporter
//!
//! Routes:
//! - `GET /metrics`: runs one scrape and returns Prometheus text
//! - `GET /healthz`: liveness, always `OK`
//! - `GET /`: landing page linking to `/metrics`

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::error;

use crate::exposition::{MetricsExporter, CONTENT_TYPE};

const LANDING_PAGE: &str = r#"<html>
<head><title>Redfish Exporter</title></head>
<body>
<h1>Redfish Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

#[derive(Clone)]
pub struct AppState {
    pub exporter: Arc<MetricsExporter>,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Html(LANDING_PAGE) }))
        .route("/healthz", get(|| async { "OK" }))
        .route("/metrics", get(metrics))
        .with_state(app_state)
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.exporter.scrape().await {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("failed to encode metrics: {e}")).into_response()
        }
    }
}
