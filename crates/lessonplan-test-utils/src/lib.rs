//! Shared test utilities for lessonplan integration tests.
//!
//! [`FakeUpstream`] stands in for the Gemini API: a real HTTP server on an
//! ephemeral localhost port that answers every request with a canned status
//! and body and counts how many requests it received.
//!
//! [`capture_logs`] records `tracing` output on the current thread so tests
//! can assert on what was logged.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct Captured {
    body: Value,
    query: Option<String>,
}

struct Shared {
    status: StatusCode,
    body: Value,
    hits: AtomicUsize,
    requests: Mutex<Vec<Captured>>,
}

/// A running fake generation service.
pub struct FakeUpstream {
    addr: SocketAddr,
    shared: Arc<Shared>,
    handle: JoinHandle<()>,
}

impl FakeUpstream {
    /// Start a server that replies `status` with the JSON `body`.
    pub async fn start(status: u16, body: Value) -> Self {
        let shared = Arc::new(Shared {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body,
            hits: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(respond).with_state(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake upstream");
        let addr = listener.local_addr().expect("fake upstream has no address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("fake upstream server failed");
        });

        Self {
            addr,
            shared,
            handle,
        }
    }

    /// Start a server that answers with a successful Gemini response whose
    /// only text part is `text`.
    pub async fn replying_with_text(text: &str) -> Self {
        Self::start(200, gemini_text_response(text)).await
    }

    /// Start a server that answers with a Gemini-style error body.
    pub async fn failing(status: u16, message: &str) -> Self {
        Self::start(status, gemini_error_response(status, message)).await
    }

    /// Base URL to configure the client with (no trailing slash).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.shared.hits.load(Ordering::SeqCst)
    }

    /// JSON bodies of every request received, in order.
    pub async fn request_bodies(&self) -> Vec<Value> {
        self.shared
            .requests
            .lock()
            .await
            .iter()
            .map(|c| c.body.clone())
            .collect()
    }

    /// Raw query strings of every request received, in order.
    pub async fn request_queries(&self) -> Vec<Option<String>> {
        self.shared
            .requests
            .lock()
            .await
            .iter()
            .map(|c| c.query.clone())
            .collect()
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(
    State(shared): State<Arc<Shared>>,
    RawQuery(query): RawQuery,
    body: String,
) -> impl IntoResponse {
    shared.hits.fetch_add(1, Ordering::SeqCst);
    let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
    shared.requests.lock().await.push(Captured { body, query });
    (shared.status, axum::Json(shared.body.clone()))
}

/// A successful `generateContent` response body.
pub fn gemini_text_response(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }
        ]
    })
}

/// A Gemini error response body.
pub fn gemini_error_response(status: u16, message: &str) -> Value {
    json!({
        "error": {
            "code": status,
            "message": message,
            "status": "RESOURCE_EXHAUSTED"
        }
    })
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// Log output collected by [`capture_logs`].
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Everything logged so far, without ANSI colours.
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(|p| p.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

pub struct CapturedWriter(Arc<std::sync::Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(self.0.clone())
    }
}

/// Route `tracing` events on this thread into a buffer until the returned
/// guard is dropped. Works with `#[tokio::test]`, whose runtime runs on the
/// test thread.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
