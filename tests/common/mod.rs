//! In-process history service for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use verity::history::{EntryId, HistoryEntry, NewEntry};
use verity::Settings;

const REQUIRED_FIELDS: [&str; 7] = [
    "type",
    "content",
    "score",
    "confidence",
    "date",
    "fullContent",
    "analysis",
];

/// How the mock answers the next requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Serve a login page with 200, as after an expired session redirect.
    LoginPage,
    /// Fail every request with this status and a JSON error body.
    Status(u16),
    /// Reply 200 with `{"status": "error"}`.
    AppError,
    /// Reply 200 with this raw JSON body.
    Body(&'static str),
}

pub struct MockState {
    entries: Mutex<Vec<HistoryEntry>>,
    next_id: Mutex<i64>,
    mode: Mutex<Mode>,
    session_cookie: Option<String>,
    rotated_cookie: Option<String>,
    requests: Mutex<Vec<String>>,
    cookies: Mutex<Vec<String>>,
}

impl MockState {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
            mode: Mutex::new(Mode::Normal),
            session_cookie: None,
            rotated_cookie: None,
            requests: Mutex::new(Vec::new()),
            cookies: Mutex::new(Vec::new()),
        }
    }

    /// Only answer requests carrying this cookie.
    pub fn requiring_cookie(mut self, cookie: &str) -> Self {
        self.session_cookie = Some(cookie.to_string());
        self
    }

    /// Send this `Set-Cookie` value with every collection listing.
    pub fn rotating_session_to(mut self, set_cookie: &str) -> Self {
        self.rotated_cookie = Some(set_cookie.to_string());
        self
    }

    /// Seed entries, assigning ids in order.
    pub fn with_entries(self, contents: &[&str]) -> Self {
        for content in contents {
            self.insert(NewEntry::text(content, 50, 90));
        }
        self
    }

    fn insert(&self, entry: NewEntry) -> EntryId {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let id = EntryId(*next_id);
        self.entries
            .lock()
            .unwrap()
            .push(HistoryEntry::from_new(entry, id));
        id
    }

    pub fn set_mode(&self, mode: Mode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn ids(&self) -> Vec<i64> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| e.id.map(|id| id.0))
            .collect()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// `Cookie` header of every request, empty when none was sent.
    pub fn cookies(&self) -> Vec<String> {
        self.cookies.lock().unwrap().clone()
    }

    /// Record the request and decide whether it gets a canned failure.
    fn intercept(&self, request: String, headers: &HeaderMap) -> Option<Response> {
        self.requests.lock().unwrap().push(request);
        let sent = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        self.cookies.lock().unwrap().push(sent.to_string());

        if let Some(ref cookie) = self.session_cookie {
            if !sent.contains(cookie.as_str()) {
                return Some(login_page());
            }
        }

        match *self.mode.lock().unwrap() {
            Mode::Normal => None,
            Mode::LoginPage => Some(login_page()),
            Mode::Status(code) => {
                let status = StatusCode::from_u16(code).unwrap();
                Some(error_reply(status, "Internal failure"))
            }
            Mode::AppError => Some(error_reply(StatusCode::OK, "Database is locked")),
            Mode::Body(body) => {
                Some(([(header::CONTENT_TYPE, "application/json")], body).into_response())
            }
        }
    }
}

fn login_page() -> Response {
    Html("<!doctype html><title>Sign in</title>").into_response()
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"status": "error", "message": message}))).into_response()
}

type Shared = State<Arc<MockState>>;

async fn list(State(state): Shared, headers: HeaderMap) -> Response {
    if let Some(reply) = state.intercept("GET /api/history".into(), &headers) {
        return reply;
    }
    let mut response = Json(state.entries()).into_response();
    if let Some(ref set_cookie) = state.rotated_cookie {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, set_cookie.parse().unwrap());
    }
    response
}

async fn create(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Some(reply) = state.intercept("POST /api/history".into(), &headers) {
        return reply;
    }
    if !REQUIRED_FIELDS.iter().all(|f| body.get(f).is_some()) {
        return error_reply(StatusCode::BAD_REQUEST, "Missing required fields");
    }
    let entry: NewEntry = match serde_json::from_value(body) {
        Ok(entry) => entry,
        Err(e) => return error_reply(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };
    let id = state.insert(entry);
    Json(json!({"status": "success", "message": "History entry added", "id": id.0}))
        .into_response()
}

async fn clear(State(state): Shared, headers: HeaderMap) -> Response {
    if let Some(reply) = state.intercept("DELETE /api/history".into(), &headers) {
        return reply;
    }
    state.entries.lock().unwrap().clear();
    Json(json!({"status": "success", "message": "All history cleared"})).into_response()
}

async fn get_one(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(reply) = state.intercept(format!("GET /api/history/{}", id), &headers) {
        return reply;
    }
    let found = state
        .entries()
        .into_iter()
        .find(|e| e.id == Some(EntryId(id)));
    match found {
        Some(entry) => Json(entry).into_response(),
        None => error_reply(StatusCode::NOT_FOUND, "Entry not found or unauthorized"),
    }
}

async fn delete_one(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(reply) = state.intercept(format!("DELETE /api/history/{}", id), &headers) {
        return reply;
    }
    let mut entries = state.entries.lock().unwrap();
    let before = entries.len();
    entries.retain(|e| e.id != Some(EntryId(id)));
    if entries.len() == before {
        return error_reply(StatusCode::NOT_FOUND, "Entry not found or unauthorized");
    }
    Json(json!({"status": "success", "message": "History entry deleted"})).into_response()
}

pub struct MockServer {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub fn settings(&self) -> Settings {
        Settings::with_base_url(self.base_url.clone())
    }
}

/// Serve the mock on an ephemeral local port.
pub async fn spawn(state: MockState) -> MockServer {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/api/history", get(list).post(create).delete(clear))
        .route("/api/history/:id", get(get_one).delete(delete_one))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });

    MockServer {
        base_url: format!("http://{}", addr),
        state,
    }
}
