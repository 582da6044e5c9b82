//! Shared mock backends for integration tests.
//!
//! Each backend runs on its own tokio runtime in a background thread so the
//! blocking client under test can be driven from a plain `#[test]`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::json;

pub const CSRF_NAME: &str = "X-CSRF";
pub const TOKEN: &str = "tok123";

/// A running mock backend.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

fn serve(app: Router) -> SocketAddr {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    rx.recv().unwrap()
}

/// Backend that rejects state-changing calls without a valid CSRF token.
///
/// - `/public`: always 200
/// - `/api/items`: 403 with `session` and `X-CSRF` cookies unless the request
///   carries `X-CSRF: tok123` and the matching cookie; then echoes what it saw
///   (200 for GET/POST, 204 for PUT/DELETE)
#[allow(dead_code)]
pub fn start_csrf_backend() -> MockBackend {
    let hits = Arc::new(AtomicU32::new(0));
    let app = Router::new()
        .route("/public", get(public))
        .route("/api/items", any(protected))
        .with_state(hits.clone());

    MockBackend { addr: serve(app), hits }
}

async fn public(State(hits): State<Arc<AtomicU32>>) -> &'static str {
    hits.fetch_add(1, Ordering::SeqCst);
    "public"
}

async fn protected(
    State(hits): State<Arc<AtomicU32>>,
    method: axum::http::Method,
    headers: HeaderMap,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);

    let header = |name| {
        headers
            .get(name)
            .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
            .unwrap_or("")
    };
    let cookie = header(COOKIE.as_str()).to_string();
    let token = header(CSRF_NAME).to_string();
    let cookie_ok = cookie
        .split(';')
        .any(|pair| pair.trim() == format!("{CSRF_NAME}={TOKEN}"));

    if token != TOKEN || !cookie_ok {
        return (
            StatusCode::FORBIDDEN,
            AppendHeaders([
                (SET_COOKIE, "session=abc; Path=/; HttpOnly".to_string()),
                (SET_COOKIE, format!("{CSRF_NAME}={TOKEN}; Path=/")),
            ]),
            "missing csrf token",
        )
            .into_response();
    }

    if method == axum::http::Method::PUT || method == axum::http::Method::DELETE {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(json!({ "cookie": cookie, "csrf": token })).into_response()
}

/// Backend whose `/health` answers 503 until it has been hit `ready_after` times.
#[allow(dead_code)]
pub fn start_warming_backend(ready_after: u32) -> MockBackend {
    let hits = Arc::new(AtomicU32::new(0));
    let app = Router::new()
        .route(
            "/health",
            get(move |State(hits): State<Arc<AtomicU32>>| async move {
                let count = hits.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= ready_after {
                    (StatusCode::OK, "ready")
                } else {
                    (StatusCode::SERVICE_UNAVAILABLE, "warming up")
                }
            }),
        )
        .with_state(hits.clone());

    MockBackend { addr: serve(app), hits }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}
