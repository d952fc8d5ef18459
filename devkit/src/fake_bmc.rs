/*!
Fake BMC for client tests

Serves a map of Redfish documents over plain HTTP on an ephemeral port and
implements session login/logout. The service root is readable without
credentials; every other GET needs either a session token or a basic
`Authorization` header, mirroring real BMCs.
*/

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use redfish_exporter::config::HostConfig;

pub const SESSIONS_PATH: &str = "/redfish/v1/SessionService/Sessions";
pub const SESSION_TOKEN: &str = "fake-session-token";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

/// How a request authenticated against the fake BMC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    None,
    Token,
    Basic,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub auth: Auth,
}

struct BmcState {
    documents: Mutex<HashMap<String, Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
    session_open: Mutex<bool>,
}

pub struct FakeBmc {
    addr: SocketAddr,
    state: Arc<BmcState>,
    handle: JoinHandle<()>,
}

impl FakeBmc {
    /// Start serving `documents` (keyed by `@odata.id` path)
    pub async fn start(documents: HashMap<String, Value>) -> anyhow::Result<Self> {
        let state = Arc::new(BmcState {
            documents: Mutex::new(documents),
            requests: Mutex::new(Vec::new()),
            session_open: Mutex::new(false),
        });
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "fake BMC stopped");
            }
        });
        Ok(Self { addr, state, handle })
    }

    /// Start with [`standard_documents`]
    pub async fn standard() -> anyhow::Result<Self> {
        Self::start(standard_documents()).await
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client settings pointing at this BMC
    pub fn host_config(&self, basic_auth: bool) -> HostConfig {
        HostConfig {
            endpoint: self.endpoint(),
            username: USERNAME.into(),
            password: PASSWORD.into(),
            basic_auth,
            insecure_skip_verify: true,
            request_timeout_seconds: 5,
        }
    }

    pub fn set_document(&self, path: &str, document: Value) {
        self.state.documents.lock().insert(path.to_string(), document);
    }

    pub fn remove_document(&self, path: &str) {
        self.state.documents.lock().remove(path);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn session_open(&self) -> bool {
        *self.state.session_open.lock()
    }
}

impl Drop for FakeBmc {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authenticate(headers: &HeaderMap) -> Auth {
    if headers
        .get("X-Auth-Token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == SESSION_TOKEN)
    {
        return Auth::Token;
    }
    if headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "))
    {
        return Auth::Basic;
    }
    Auth::None
}

async fn handle(
    State(state): State<Arc<BmcState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let auth = authenticate(&headers);
    state.requests.lock().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        auth,
    });

    if method == Method::POST && path == SESSIONS_PATH {
        return login(&state, &body);
    }

    if method == Method::DELETE && path.starts_with(SESSIONS_PATH) {
        if auth != Auth::Token {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        *state.session_open.lock() = false;
        return StatusCode::NO_CONTENT.into_response();
    }

    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let is_root = path.trim_end_matches('/') == "/redfish/v1";
    if !is_root && auth == Auth::None {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let documents = state.documents.lock();
    let document = documents
        .get(&path)
        .or_else(|| documents.get(path.trim_end_matches('/')))
        .or_else(|| documents.get(&format!("{}/", path.trim_end_matches('/'))));
    match document {
        Some(doc) => Json(doc.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn login(state: &BmcState, body: &[u8]) -> Response {
    let credentials: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    if credentials["UserName"] != USERNAME || credentials["Password"] != PASSWORD {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    *state.session_open.lock() = true;
    (
        StatusCode::CREATED,
        [
            ("X-Auth-Token", SESSION_TOKEN.to_string()),
            ("Location", format!("{SESSIONS_PATH}/1")),
        ],
        Json(json!({ "Id": "1", "UserName": USERNAME })),
    )
        .into_response()
}

/// One chassis with thermal, power and one network adapter with two ports
pub fn standard_documents() -> HashMap<String, Value> {
    let docs = [
        (
            "/redfish/v1/",
            json!({
                "@odata.id": "/redfish/v1/",
                "Chassis": { "@odata.id": "/redfish/v1/Chassis" },
                "SessionService": { "@odata.id": "/redfish/v1/SessionService" },
                "Links": { "Sessions": { "@odata.id": SESSIONS_PATH } }
            }),
        ),
        (
            "/redfish/v1/Chassis",
            json!({
                "Members": [{ "@odata.id": "/redfish/v1/Chassis/1" }]
            }),
        ),
        (
            "/redfish/v1/Chassis/1",
            json!({
                "Id": "1",
                "Name": "Computer System Chassis",
                "Status": { "Health": "OK", "State": "Enabled" },
                "Manufacturer": "Contoso",
                "Model": "3500RX",
                "PartNumber": "224071-J23",
                "SKU": "8675309",
                "Thermal": { "@odata.id": "/redfish/v1/Chassis/1/Thermal" },
                "Power": { "@odata.id": "/redfish/v1/Chassis/1/Power" },
                "NetworkAdapters": { "@odata.id": "/redfish/v1/Chassis/1/NetworkAdapters" }
            }),
        ),
        (
            "/redfish/v1/Chassis/1/Thermal",
            json!({
                "Name": "Thermal",
                "Temperatures": [{
                    "MemberId": "0",
                    "Name": "CPU1 Temp",
                    "ReadingCelsius": 41,
                    "Status": { "Health": "OK", "State": "Enabled" }
                }],
                "Fans": [{
                    "MemberId": "0",
                    "FanName": "Fan 1",
                    "Reading": 50,
                    "ReadingUnits": "Percent",
                    "MinReadingRange": 0,
                    "MaxReadingRange": 10000,
                    "Status": { "Health": "Warning", "State": "Enabled" }
                }]
            }),
        ),
        (
            "/redfish/v1/Chassis/1/Power",
            json!({
                "Voltages": [{
                    "MemberId": "0",
                    "Name": "VRM1 Voltage",
                    "ReadingVolts": 12,
                    "Status": { "Health": "OK", "State": "Enabled" }
                }],
                "PowerControl": [{
                    "MemberId": "0",
                    "Name": "System Power Control",
                    "PowerMetrics": { "AverageConsumedWatts": 319 }
                }],
                "PowerSupplies": [{
                    "MemberId": "0",
                    "Name": "Power Supply 1",
                    "PowerInputWatts": 344,
                    "PowerOutputWatts": 319,
                    "EfficiencyPercent": 92,
                    "PowerCapacityWatts": 800,
                    "LastPowerOutputWatts": 325,
                    "Status": { "Health": "OK", "State": "Enabled" }
                }]
            }),
        ),
        (
            "/redfish/v1/Chassis/1/NetworkAdapters",
            json!({
                "Members": [{ "@odata.id": "/redfish/v1/Chassis/1/NetworkAdapters/NIC1" }]
            }),
        ),
        (
            "/redfish/v1/Chassis/1/NetworkAdapters/NIC1",
            json!({
                "Id": "NIC1",
                "Name": "Network Adapter 1",
                "Status": { "Health": "OK", "State": "Enabled" },
                "Metrics": { "@odata.id": "/redfish/v1/Chassis/1/NetworkAdapters/NIC1/Metrics" },
                "NetworkPorts": { "@odata.id": "/redfish/v1/Chassis/1/NetworkAdapters/NIC1/NetworkPorts" }
            }),
        ),
        (
            "/redfish/v1/Chassis/1/NetworkAdapters/NIC1/Metrics",
            json!({ "TXBytes": 1000, "RXBytes": 2000 }),
        ),
        (
            "/redfish/v1/Chassis/1/NetworkAdapters/NIC1/NetworkPorts",
            json!({
                "Members": [
                    { "@odata.id": "/redfish/v1/Chassis/1/NetworkAdapters/NIC1/NetworkPorts/1" },
                    { "@odata.id": "/redfish/v1/Chassis/1/NetworkAdapters/NIC1/NetworkPorts/2" }
                ]
            }),
        ),
        (
            "/redfish/v1/Chassis/1/NetworkAdapters/NIC1/NetworkPorts/1",
            json!({
                "Id": "1",
                "Name": "Port 1",
                "Status": { "Health": "OK", "State": "Enabled" },
                "LinkStatus": "Up",
                "CurrentLinkSpeedMbps": 10000,
                "ActiveLinkTechnology": "Ethernet",
                "PhysicalPortNumber": "1"
            }),
        ),
        (
            "/redfish/v1/Chassis/1/NetworkAdapters/NIC1/NetworkPorts/2",
            json!({
                "Id": "2",
                "Name": "Port 2",
                "Status": { "Health": "OK", "State": "StandbyOffline" },
                "LinkStatus": "Down",
                "CurrentLinkSpeedMbps": 0,
                "ActiveLinkTechnology": "Ethernet",
                "PhysicalPortNumber": "2"
            }),
        ),
    ];
    docs.into_iter()
        .map(|(path, doc)| (path.to_string(), doc))
        .collect()
}
