//! Common test utilities for client integration testing.
//!
//! Provides an in-process fake engine: an axum server bound to an ephemeral
//! local port that answers canned JSON per method and path and records every
//! request it receives.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use helios_search_client::Client;

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("helios_search_client=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A request received by the fake engine.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    /// Returns the body as text.
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("request body is not UTF-8")
    }
}

#[derive(Debug, Clone)]
struct CannedResponse {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
}

#[derive(Clone, Default)]
struct EngineState {
    routes: Arc<Vec<CannedResponse>>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Builder for [`FakeEngine`].
#[derive(Default)]
pub struct FakeEngineBuilder {
    routes: Vec<CannedResponse>,
}

impl FakeEngineBuilder {
    /// Answers `method path` with the given status and raw body.
    pub fn respond(mut self, method: Method, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.push(CannedResponse {
            method,
            path: path.to_string(),
            status: StatusCode::from_u16(status).expect("invalid status"),
            body: body.into(),
        });
        self
    }

    /// Answers `method path` with `200 OK` and a JSON body.
    pub fn json(self, method: Method, path: &str, body: Value) -> Self {
        self.respond(method, path, 200, body.to_string())
    }

    /// Binds to an ephemeral port and starts serving.
    pub async fn start(self) -> FakeEngine {
        let state = EngineState {
            routes: Arc::new(self.routes),
            recorded: Arc::default(),
        };
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake engine");
        let addr = listener.local_addr().expect("no local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake engine failed");
        });

        FakeEngine {
            addr,
            state,
            handle,
        }
    }
}

/// A running fake engine. Stops serving when dropped.
pub struct FakeEngine {
    pub addr: SocketAddr,
    state: EngineState,
    handle: JoinHandle<()>,
}

impl FakeEngine {
    /// Starts describing a fake engine.
    pub fn builder() -> FakeEngineBuilder {
        FakeEngineBuilder::default()
    }

    /// Returns a client pointed at this engine.
    pub fn client(&self) -> Client {
        Client::new(self.addr.ip().to_string(), self.addr.port())
    }

    /// Returns every request received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.recorded.lock().expect("poisoned").clone()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("fake engine received no requests")
    }
}

impl Drop for FakeEngine {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(state): State<EngineState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.recorded.lock().expect("poisoned").push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: header_value(header::CONTENT_TYPE),
        authorization: header_value(header::AUTHORIZATION),
        body,
    });

    let canned = state
        .routes
        .iter()
        .find(|r| r.method == method && r.path == uri.path());
    match canned {
        Some(r) => (
            r.status,
            [(header::CONTENT_TYPE, "application/json")],
            r.body.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_IMPLEMENTED,
            format!("fake engine has no route for {} {}", method, uri.path()),
        )
            .into_response(),
    }
}

/// Returns a local port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let port = listener.local_addr().expect("no local address").port();
    drop(listener);
    port
}
