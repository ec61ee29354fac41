mod construction;
mod pin_flow;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use chrono::Timelike;
use ecobee_auth::Credential;
use ecobee_auth_core::time::DateTime;
use ecobee_auth_core::{Context, Error, HttpSend, Result};
use ecobee_auth_fs_tokio::TokioFs;
use http::{Method, StatusCode};

pub const CLIENT_ID: &str = "app-key";

pub const TOKEN_BODY: &str = r#"{
    "access_token": "Rc7JE8P7XUgSCPogLOx2VLMfITqQQrjg",
    "token_type": "Bearer",
    "expires_in": 3599,
    "refresh_token": "og2Obost3ucRo1ofo0EDoslGltmFMe2g",
    "scope": "smartWrite"
}"#;

pub const PIN_BODY: &str = r#"{
    "ecobeePin": "bv29",
    "code": "uWIiWsbQaG9sqGHNT0eN3JuS7DnuVqbm",
    "scope": "smartRead,smartWrite",
    "expires_in": 9,
    "interval": 30
}"#;

pub const PENDING_BODY: &str = r#"{
    "error": "authorization_pending",
    "error_description": "Waiting for user to authorize application."
}"#;

/// A request as seen by [`MockHttpSend`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// HttpSend that answers every request with the same canned response and
/// records what it was sent.
#[derive(Debug, Clone)]
pub struct MockHttpSend {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    unreachable: bool,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpSend {
    pub fn ok(body: &'static str) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub fn with_status(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
            unreachable: false,
            requests: Arc::default(),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::ok("")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push(RecordedRequest {
            method: parts.method,
            uri: parts.uri.to_string(),
            content_type: parts
                .headers
                .get(http::header::CONTENT_TYPE)
                .map(|v| v.to_str().unwrap().to_string()),
            body: String::from_utf8(body.to_vec()).unwrap(),
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.unreachable {
            return Err(Error::transport("connection refused"));
        }

        let resp = http::Response::builder()
            .status(self.status)
            .body(Bytes::from_static(self.body.as_bytes()))
            .unwrap();
        Ok(resp)
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_context(http: MockHttpSend) -> Context {
    init_logger();

    Context::new()
        .with_file_read(TokioFs)
        .with_file_write(TokioFs)
        .with_http_send(http)
}

pub fn cache_path(dir: &tempfile::TempDir) -> String {
    dir.path().join("cache.json").to_string_lossy().to_string()
}

/// A credential whose expiry has whole-second precision.
pub fn test_credential(refresh_token: &str, expiry: DateTime) -> Credential {
    Credential {
        access_token: "8CA9RTnxvHtcqLmU0DtOBpEDzLCUD1zf".to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh_token.to_string(),
        expiry: expiry.with_nanosecond(0).unwrap(),
        extra: HashMap::from([("scope".to_string(), "smartRead".to_string())]),
    }
}
