//! Test double of the remote completion service.
//!
//! Emulates just enough of the real API for the client's integration tests:
//! a bearer-authenticated streaming endpoint, an echo endpoint that reports
//! the exact request it received, a fixed-status endpoint, and a
//! notification sink with a counter for verifying fire-and-forget sends.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Bearer token the completions route expects.
pub const API_KEY: &str = "secret-key";

/// What `/echo` reports about the request it received. Header names are
/// lowercased by the http stack.
#[derive(Debug, Serialize, Deserialize)]
pub struct EchoReport {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub type Notifications = Arc<RwLock<Vec<String>>>;

pub fn app() -> Router {
    let notifications: Notifications = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/v1/completions", any(completions))
        .route("/echo", any(echo))
        .route("/status/{code}", any(fixed_status))
        .route("/notify", post(record_notification))
        .route("/notify/count", get(notification_count))
        .with_state(notifications)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Streams a short SSE exchange if the bearer token matches, 401 otherwise.
async fn completions(headers: HeaderMap) -> Response {
    let expected = format!("Bearer {API_KEY}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let events = "data: {\"completion\":\"hello\"}\n\ndata: [DONE]\n\n";
    (
        [(header::CONTENT_TYPE, "text/event-stream")],
        events.to_string(),
    )
        .into_response()
}

/// Reports the received method, headers, and body back as JSON.
async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<EchoReport> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    Json(EchoReport {
        method: method.to_string(),
        headers,
        body,
    })
}

/// Responds with whatever status the path names.
async fn fixed_status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn record_notification(State(db): State<Notifications>, body: String) -> StatusCode {
    db.write().await.push(body);
    StatusCode::OK
}

async fn notification_count(State(db): State<Notifications>) -> Json<usize> {
    Json(db.read().await.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_report_roundtrips_through_json() {
        let report = EchoReport {
            method: "POST".to_string(),
            headers: BTreeMap::from([("x-trace".to_string(), "abc".to_string())]),
            body: "{}".to_string(),
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: EchoReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.method, "POST");
        assert_eq!(back.headers["x-trace"], "abc");
        assert_eq!(back.body, "{}");
    }

    #[test]
    fn fixed_status_rejects_invalid_codes() {
        // StatusCode::from_u16 only accepts 100..=999.
        assert!(StatusCode::from_u16(99).is_err());
    }
}
