//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::api::{ApiClient, HttpTransport, OutgoingRequest, RawResponse, TransportError};
use crate::session::store::MemoryTokenStore;

pub const TEST_BASE_URL: &str = "http://backend.test";

/// Unsigned JWT-shaped token carrying `claims`.
pub fn fake_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

/// Scripted transport that records every request it is given.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<OutgoingRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: &Value) {
        self.push_raw(status, body.to_string().as_bytes());
    }

    pub fn push_raw(&self, status: u16, body: &[u8]) {
        let response = RawResponse { status, body: body.to_vec() };
        self.responses.lock().expect("mock mutex should lock").push_back(Ok(response));
    }

    pub fn push_network_error(&self, message: &str) {
        self.responses
            .lock()
            .expect("mock mutex should lock")
            .push_back(Err(TransportError::NoResponse(message.to_owned())));
    }

    pub fn push_body_read_error(&self, status: u16, message: &str) {
        self.responses
            .lock()
            .expect("mock mutex should lock")
            .push_back(Err(TransportError::BodyRead { status, message: message.to_owned() }));
    }

    pub fn requests(&self) -> Vec<OutgoingRequest> {
        self.requests.lock().expect("mock mutex should lock").clone()
    }

    pub fn last_request(&self) -> OutgoingRequest {
        self.requests().pop().expect("at least one request should have been sent")
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().expect("mock mutex should lock").push(request);
        self.responses
            .lock()
            .expect("mock mutex should lock")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::NoResponse("no scripted response".to_owned())))
    }
}

pub fn client_with(transport: &Arc<MockTransport>, store: &Arc<MemoryTokenStore>) -> ApiClient {
    ApiClient::new(TEST_BASE_URL, transport.clone(), store.clone())
}

/// `Authorization` header of `request` as a string, if any.
pub fn auth_header(request: &OutgoingRequest) -> Option<String> {
    request
        .headers
        .get(reqwest::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}
