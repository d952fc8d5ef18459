//! HTTP implementation of [`DeviceClient`] against a Redfish service
//!
//! Handles:
//! - endpoint normalisation and service-root discovery
//! - basic auth or Redfish session tokens (`X-Auth-Token`)
//! - collection expansion (`Members[].@odata.id`)
//! - 404 / missing link → subsystem absent

use async_trait::async_trait;
use futures::future::{join_all, try_join_all};
use parking_lot::Mutex;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::models::{AdapterMetrics, Chassis, NetworkAdapter, NetworkPort, Power, Thermal};
use super::{wire, ClientError, DeviceClient};
use crate::config::HostConfig;

const SERVICE_ROOT: &str = "/redfish/v1/";
const DEFAULT_SESSIONS: &str = "/redfish/v1/SessionService/Sessions";
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

#[derive(Debug)]
struct Session {
    token: String,
    location: Option<String>,
}

/// Redfish client bound to one BMC
pub struct RedfishClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    basic_auth: bool,
    chassis_path: Option<String>,
    session: Mutex<Option<Session>>,
}

impl RedfishClient {
    /// Connect to the BMC: read the service root and, unless basic auth is
    /// configured, open a session.
    pub async fn connect(config: &HostConfig) -> Result<Self, ClientError> {
        let base_url = normalize_endpoint(&config.endpoint)?;
        debug!(endpoint = %base_url, "Connecting to redfish service");

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .timeout(config.request_timeout())
            .build()?;

        let mut client = Self {
            http,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            basic_auth: config.basic_auth,
            chassis_path: None,
            session: Mutex::new(None),
        };

        let root: wire::ServiceRoot = client
            .get_json(SERVICE_ROOT)
            .await?
            .ok_or_else(|| ClientError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                url: client.url(SERVICE_ROOT),
            })?;
        client.chassis_path = root.chassis.map(|l| l.odata_id);

        if !client.basic_auth {
            let sessions = root
                .links
                .sessions
                .map(|l| l.odata_id)
                .unwrap_or_else(|| DEFAULT_SESSIONS.to_string());
            client.login(&sessions).await?;
        }

        info!(endpoint = %client.base_url, "Connected to redfish service");
        Ok(client)
    }

    /// Delete the Redfish session, if any. Failures are only logged.
    pub async fn logout(&self) {
        let Some(session) = self.session.lock().take() else {
            return;
        };
        let Some(location) = session.location else {
            return;
        };
        let url = self.url(&location);
        let result = self
            .http
            .delete(&url)
            .header(AUTH_TOKEN_HEADER, &session.token)
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => info!("Redfish session closed"),
            Ok(resp) => warn!(status = resp.status().as_u16(), "Redfish logout rejected"),
            Err(e) => warn!(error = %e, "Redfish logout failed"),
        }
    }

    async fn login(&self, sessions_path: &str) -> Result<(), ClientError> {
        let url = self.url(sessions_path);
        let body = serde_json::json!({
            "UserName": self.username,
            "Password": self.password,
        });
        let resp = self.http.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Auth(format!("{} returned HTTP {}", url, resp.status())));
        }
        let token = resp
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ClientError::Auth(format!("no {AUTH_TOKEN_HEADER} in login response")))?;
        let location = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        *self.session.lock() = Some(Session { token, location });
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        if self.basic_auth {
            return builder.basic_auth(&self.username, Some(&self.password));
        }
        match self.session.lock().as_ref() {
            Some(session) => builder.header(AUTH_TOKEN_HEADER, &session.token),
            None => builder,
        }
    }

    /// GET a JSON document; `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ClientError> {
        let url = self.url(path);
        let resp = self.request(Method::GET, &url).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ClientError::Decode { url, source })
    }

    /// Expand a collection into its member documents.
    /// Members that vanished between listing and fetching are skipped.
    async fn get_members<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<Vec<T>>, ClientError> {
        let Some(collection) = self.get_json::<wire::Collection>(path).await? else {
            return Ok(None);
        };
        let members = try_join_all(
            collection
                .members
                .iter()
                .map(|m| self.get_json::<T>(&m.odata_id)),
        )
        .await?;
        Ok(Some(members.into_iter().flatten().collect()))
    }

    async fn adapter_metrics(&self, adapter: &wire::NetworkAdapter) -> Option<AdapterMetrics> {
        let link = adapter.metrics.as_ref()?;
        match self.get_json::<wire::AdapterMetrics>(&link.odata_id).await {
            Ok(metrics) => metrics.map(AdapterMetrics::from),
            Err(e) => {
                debug!(adapter_id = %adapter.id, error = %e, "network adapter metrics unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl DeviceClient for RedfishClient {
    async fn list_chassis(&self) -> Result<Vec<Chassis>, ClientError> {
        let Some(path) = self.chassis_path.as_deref() else {
            return Ok(Vec::new());
        };
        let chassis = self.get_members::<wire::Chassis>(path).await?.unwrap_or_default();
        Ok(chassis.into_iter().map(Chassis::from).collect())
    }

    async fn thermal(&self, chassis: &Chassis) -> Result<Option<Thermal>, ClientError> {
        let Some(path) = chassis.links.thermal.as_deref() else {
            return Ok(None);
        };
        Ok(self.get_json::<wire::Thermal>(path).await?.map(Thermal::from))
    }

    async fn power(&self, chassis: &Chassis) -> Result<Option<Power>, ClientError> {
        let Some(path) = chassis.links.power.as_deref() else {
            return Ok(None);
        };
        Ok(self.get_json::<wire::Power>(path).await?.map(Power::from))
    }

    async fn network_adapters(
        &self,
        chassis: &Chassis,
    ) -> Result<Option<Vec<NetworkAdapter>>, ClientError> {
        let Some(path) = chassis.links.network_adapters.as_deref() else {
            return Ok(None);
        };
        let Some(adapters) = self.get_members::<wire::NetworkAdapter>(path).await? else {
            return Ok(None);
        };
        let metrics = join_all(adapters.iter().map(|a| self.adapter_metrics(a))).await;
        Ok(Some(
            adapters
                .into_iter()
                .zip(metrics)
                .map(|(adapter, metrics)| adapter.into_model(metrics))
                .collect(),
        ))
    }

    async fn network_ports(
        &self,
        adapter: &NetworkAdapter,
    ) -> Result<Option<Vec<NetworkPort>>, ClientError> {
        let Some(path) = adapter.ports_link.as_deref() else {
            return Ok(None);
        };
        Ok(self
            .get_members::<wire::NetworkPort>(path)
            .await?
            .map(|ports| ports.into_iter().map(NetworkPort::from).collect()))
    }
}

/// Prefix `https://` when no scheme is given and drop trailing slashes
fn normalize_endpoint(endpoint: &str) -> Result<String, ClientError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(ClientError::InvalidEndpoint("empty endpoint".into()));
    }
    let with_scheme = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };
    let url = reqwest::Url::parse(&with_scheme)
        .map_err(|e| ClientError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidEndpoint(format!(
            "{endpoint}: unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(with_scheme.trim_end_matches('/').to_string())
}
