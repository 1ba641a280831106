use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use super::{CLIENT_ID, CLIENT_SECRET};

pub const SIGNUP_ID: &str = "5e76a7ca-577c-4f47-a752-9e1e0cee9e49";
pub const TRANSACTION_ID: &str = "dfe1f2ff-8f1d-4d3a-9b5e-2f6c1a0c7e11";

/// Behavior of the mock Incognia server.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Status of the token endpoint, `200` issues a token.
    pub token_status: StatusCode,
    /// Lifetime of issued tokens, in seconds.
    pub expires_in: u64,
    /// Delay before the token endpoint answers.
    pub token_delay: Duration,
    /// Delay before the `slow` endpoint answers.
    pub slow_delay: Duration,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            expires_in: 3600,
            token_delay: Duration::from_millis(50),
            slow_delay: Duration::from_millis(500),
        }
    }
}

/// A request received by a domain endpoint.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

#[derive(Debug)]
struct MockState {
    config: MockConfig,
    token_requests: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn record(&self, method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) {
        let request = RecordedRequest {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            headers,
            body,
        };
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    fn is_authorized(headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("Bearer token-"))
    }
}

/// An Incognia API stand-in, listening on an ephemeral port.
///
/// Issues tokens `token-1`, `token-2`, ... and records every domain request.
#[derive(Debug)]
pub struct MockIncognia {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockIncognia {
    pub async fn start(config: MockConfig) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            config,
            token_requests: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/api/v2/token", post(token))
            .route("/api/v2/onboarding/signups", post(signup))
            .route("/api/v2/authentication/transactions", post(transaction))
            .route("/api/v2/feedbacks", post(feedback))
            .route("/api/v2/echo", post(echo).get(echo))
            .route("/api/v2/slow", get(slow))
            .route("/api/v2/status/{code}", post(status))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind mock server")?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, router).await {
                tracing::error!(%error, "mock server stopped");
            }
        });
        info!(%addr, "mock server started");

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v2", self.addr)
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("at least one domain request")
    }
}

impl Drop for MockIncognia {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn token(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    let count = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
    tokio::time::sleep(state.config.token_delay).await;

    let credentials =
        base64::engine::general_purpose::STANDARD.encode(format!("{CLIENT_ID}:{CLIENT_SECRET}"));
    let expected_authorization = format!("Basic {credentials}");
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if authorization != Some(expected_authorization.as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    if content_type != Some("application/x-www-form-urlencoded")
        || body.as_ref() != b"grant_type=client_credentials"
    {
        return StatusCode::BAD_REQUEST.into_response();
    }

    if state.config.token_status != StatusCode::OK {
        return state.config.token_status.into_response();
    }

    Json(json!({
        "access_token": format!("token-{count}"),
        "expires_in": state.config.expires_in,
        "token_type": "Bearer",
    }))
    .into_response()
}

async fn signup(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !MockState::is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.record(method, &uri, headers, body);

    Json(json!({
        "id": SIGNUP_ID,
        "request_id": "8afc84a7-f1d4-488d-bd69-36d9a37168b7",
        "risk_assessment": "low_risk",
        "reasons": [{"code": "trusted_location", "source": "local"}],
        "evidence": {"device_model": "Moto Z2 Play", "location_services": {"enabled": true}},
        "device_id": "device-id",
        "unknown_field": "ignored",
    }))
    .into_response()
}

async fn transaction(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !MockState::is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.record(method, &uri, headers, body);

    Json(json!({
        "id": TRANSACTION_ID,
        "risk_assessment": "high_risk",
        "reasons": [{"code": "multiple_accounts", "source": "global"}],
        "evidence": {},
        "device_id": "device-id",
        "installation_id": "installation-id",
    }))
    .into_response()
}

async fn feedback(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !MockState::is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.record(method, &uri, headers, body);

    // Empty body on success
    StatusCode::OK.into_response()
}

async fn echo(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !MockState::is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.record(method, &uri, headers, body.clone());

    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn slow(State(state): State<Arc<MockState>>) -> Response {
    tokio::time::sleep(state.config.slow_delay).await;
    Json(json!({})).into_response()
}

async fn status(Path(code): Path<u16>, uri: Uri) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if uri.query() == Some("payload=true") {
        (status, Json(json!({"message": "rejected", "code": code}))).into_response()
    } else {
        status.into_response()
    }
}

/// Answers every connection with `status` and a body cut short of its `Content-Length`.
pub async fn serve_truncated_response(status: &'static str) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind truncating server")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            // Wait for the whole token request before answering
            let mut request = Vec::new();
            let mut buffer = [0_u8; 1024];
            while !request.ends_with(b"grant_type=client_credentials") {
                match stream.read(&mut buffer).await {
                    Ok(0) | Err(_) => break,
                    Ok(read) => request.extend_from_slice(buffer.get(..read).unwrap_or_default()),
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{{\"message\""
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    Ok(addr)
}
