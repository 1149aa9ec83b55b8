// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted in-memory Fabric API and client/publisher builders.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use fabdeploy::auth::AccessToken;
use fabdeploy::fabric::{
    ApiRequest, ApiResponse, FabricClient, FabricError, RequestBody, RetryPolicy, Transport,
};
use fabdeploy::publish::{PublishSettings, Publisher};
use fabdeploy::types::{EnvironmentId, Target, WorkspaceId};
use parking_lot::Mutex;
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Once};
use std::time::Duration;

pub const BASE: &str = "http://fabric.test/";
pub const WORKSPACE: &str = "ws-1";
pub const ENVIRONMENT: &str = "env-1";
pub const TOKEN: &str = "test-token";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("fabdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Log lines written while a `capture_logs` guard is alive.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Route this thread's tracing output into a buffer until the guard drops.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}

/// One request as the fake saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    /// URL with the base stripped, query included.
    pub path: String,
    pub headers: HeaderMap,
    /// Multipart field, file name and bytes of an upload.
    pub upload: Option<(String, String, Bytes)>,
}

impl Recorded {
    /// `"METHOD path"`, handy for asserting call order.
    pub fn call(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// In-memory Fabric environment endpoints.
///
/// Environment GETs answer with the scripted publish states in order; the
/// last state repeats. Queued responses are served, one per request, before
/// any routing happens.
pub struct FakeFabric {
    states: Mutex<VecDeque<String>>,
    listing: Mutex<Value>,
    queued: Mutex<VecDeque<ApiResponse>>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeFabric {
    pub fn with_states(states: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            states: Mutex::new(states.iter().map(|s| s.to_string()).collect()),
            listing: Mutex::new(json!({})),
            queued: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn new() -> Arc<Self> {
        Self::with_states(&["Success"])
    }

    pub fn set_listing(&self, listing: Value) {
        *self.listing.lock() = listing;
    }

    pub fn set_wheels(&self, names: &[&str]) {
        self.set_listing(json!({ "customLibraries": { "wheelFiles": names } }));
    }

    /// Answer the next request with `status` and `body` instead of routing it.
    pub fn respond_next(&self, status: u16, body: &str) {
        self.queued.lock().push_back(ApiResponse::new(status, body));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.requests.lock().iter().map(Recorded::call).collect()
    }

    fn next_state(&self) -> String {
        let mut states = self.states.lock();
        if states.len() > 1 {
            states.pop_front().unwrap_or_default()
        } else {
            states.front().cloned().unwrap_or_else(|| "Success".to_string())
        }
    }

    fn route(&self, method: &Method, path: &str) -> ApiResponse {
        match *method {
            Method::GET if path.ends_with("/libraries") => {
                ApiResponse::new(200, self.listing.lock().to_string())
            }
            Method::GET => {
                let body = json!({
                    "displayName": ENVIRONMENT,
                    "properties": { "publishDetails": { "state": self.next_state() } }
                });
                ApiResponse::new(200, body.to_string())
            }
            _ => ApiResponse::new(200, ""),
        }
    }
}

#[async_trait]
impl Transport for FakeFabric {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, FabricError> {
        let path = request
            .url
            .strip_prefix(BASE)
            .unwrap_or(&request.url)
            .to_string();
        let upload = match &request.body {
            RequestBody::Multipart(part) => Some((
                part.field.clone(),
                part.file_name.clone(),
                part.content.clone(),
            )),
            RequestBody::Empty => None,
        };
        self.requests.lock().push(Recorded {
            method: request.method.clone(),
            path: path.clone(),
            headers: request.headers.clone(),
            upload,
        });

        if let Some(response) = self.queued.lock().pop_front() {
            return Ok(response);
        }
        Ok(self.route(&request.method, &path))
    }
}

pub fn target() -> Target {
    Target::new(
        WorkspaceId::parse(WORKSPACE).unwrap(),
        EnvironmentId::parse(ENVIRONMENT).unwrap(),
    )
}

pub fn client(fake: &Arc<FakeFabric>) -> FabricClient<Arc<FakeFabric>> {
    FabricClient::new(Arc::clone(fake), BASE, AccessToken::new(TOKEN)).with_retry(RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_secs(3),
    })
}

pub fn publisher(fake: &Arc<FakeFabric>) -> Publisher<Arc<FakeFabric>> {
    Publisher::new(
        client(fake),
        PublishSettings {
            timeout: Duration::from_secs(40 * 60),
            poll_interval: Duration::from_secs(30),
        },
    )
}

/// `workspaces/ws-1/environments/env-1` plus `suffix`.
pub fn env_path(suffix: &str) -> String {
    format!("workspaces/{WORKSPACE}/environments/{ENVIRONMENT}{suffix}")
}
