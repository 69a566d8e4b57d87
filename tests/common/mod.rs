//! In-process fake of the grading portal's screen API.
//!
//! `FakePortal::start` serves the three endpoints on `127.0.0.1:0` and
//! records every request it sees, so tests can assert on cookies, JSON
//! bodies and multipart fields.

#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::extract::{Multipart, Query, State};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use hwsubmit::config::{PortalConfig, TimeoutConfig};
use hwsubmit::PortalClient;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const LOGIN_PATH: &str = "/system/screen-login.php";
pub const HOMEWORK_PATH: &str = "/system/screen-homework.php";

/// One canned answer.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub set_cookie: Option<String>,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn json(value: Value) -> Self {
        Self::json_status(200, value)
    }

    pub fn json_status(status: u16, value: Value) -> Self {
        Self {
            status,
            body: value.to_string(),
            set_cookie: None,
            delay: None,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            set_cookie: None,
            delay: None,
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookie = Some(cookie.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Uploaded file part as the server saw it
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub path: String,
    pub action: Option<String>,
    pub cookie: Option<String>,
    pub json: Option<Value>,
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

#[derive(Debug, Clone)]
pub struct Script {
    pub login: Reply,
    pub list: Reply,
    pub submit: Reply,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            login: Reply::json(json!({"status": "success", "token": "T", "screenId": 12})),
            list: Reply::json(json!({
                "status": "success",
                "homeworks": [{"id": "1", "name": "A"}, {"id": "2", "name": "B"}]
            })),
            submit: Reply::json(json!({"status": "success", "message": "Saved"})),
        }
    }
}

#[derive(Clone)]
struct Shared {
    script: Script,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct FakePortal {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
    handle: JoinHandle<()>,
}

impl FakePortal {
    /// Must be called inside a tokio runtime; the server lives on it.
    pub async fn start(script: Script) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shared = Shared {
            script,
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route(LOGIN_PATH, post(login))
            .route(HOMEWORK_PATH, get(list).post(submit))
            .with_state(shared);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/system", self.addr)
    }

    pub fn portal_config(&self) -> PortalConfig {
        PortalConfig {
            base_url: self.base_url(),
            ..PortalConfig::default()
        }
    }

    pub fn client(&self) -> PortalClient {
        self.client_with(self.portal_config(), TimeoutConfig::default())
    }

    pub fn client_with(&self, portal: PortalConfig, timeouts: TimeoutConfig) -> PortalClient {
        PortalClient::new(&portal, &timeouts).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

impl Drop for FakePortal {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A scratch JPEG-ish file; the portal never looks inside.
pub fn write_image(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\xff\xd8\xff\xe0fake-jpeg").unwrap();
    path
}

fn cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn respond(reply: &Reply) -> Response {
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    let mut builder = Response::builder()
        .status(StatusCode::from_u16(reply.status).unwrap())
        .header(CONTENT_TYPE, "application/json");
    if let Some(set_cookie) = &reply.set_cookie {
        builder = builder.header(SET_COOKIE, set_cookie);
    }
    builder.body(Body::from(reply.body.clone())).unwrap()
}

async fn login(State(shared): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    shared.requests.lock().unwrap().push(Recorded {
        path: LOGIN_PATH.to_string(),
        cookie: cookie(&headers),
        json: serde_json::from_slice(&body).ok(),
        ..Recorded::default()
    });
    respond(&shared.script.login).await
}

async fn list(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    shared.requests.lock().unwrap().push(Recorded {
        path: HOMEWORK_PATH.to_string(),
        action: query.get("action").cloned(),
        cookie: cookie(&headers),
        ..Recorded::default()
    });
    respond(&shared.script.list).await
}

async fn submit(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> Response {
    let mut recorded = Recorded {
        path: HOMEWORK_PATH.to_string(),
        action: query.get("action").cloned(),
        cookie: cookie(&headers),
        ..Recorded::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.unwrap().to_vec();
                recorded.file = Some(UploadedFile {
                    field: name,
                    file_name,
                    content_type,
                    bytes,
                });
            }
            None => {
                let text = field.text().await.unwrap();
                recorded.fields.insert(name, text);
            }
        }
    }

    shared.requests.lock().unwrap().push(recorded);
    respond(&shared.script.submit).await
}
