//! Request building and dispatch against the completion endpoint.
//!
//! # Design
//! `CompletionClient` holds an immutable [`Endpoint`] and a shared
//! `ureq::Agent`, and carries no mutable state between calls. Each send is
//! split in two: `build_request` produces a plain-data [`HttpRequest`]
//! (method inferred from body presence, fixed/auth headers, parsed
//! overrides) without touching the network, and `dispatch` maps that value
//! onto the agent. The split keeps header assembly and method selection
//! unit-testable; the wire behavior is covered by integration tests against
//! the mock server.
//!
//! The agent disables ureq's status-as-error conversion so that non-200
//! responses come back as data and status interpretation stays here. ureq
//! speaks HTTP/1.1 only, which pins the wire version.

use std::thread;

use crate::config::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, StreamResponse};
use crate::overrides;

/// Blocking client for a single completion endpoint.
///
/// `send` blocks until the response status and headers arrive and hands the
/// caller the undrained body stream; `send_async` dispatches without
/// observing the outcome. Both may be called concurrently — the underlying
/// agent pools connections and is safe to share.
#[derive(Clone)]
pub struct CompletionClient {
    endpoint: Endpoint,
    agent: ureq::Agent,
}

impl CompletionClient {
    pub fn new(endpoint: Endpoint) -> Self {
        // Redirects are never followed: a 3xx is a non-200 status like any
        // other, not a detour to success.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_connect(Some(endpoint.connect_timeout))
            .timeout_recv_response(Some(endpoint.request_timeout))
            .build()
            .new_agent();
        Self { endpoint, agent }
    }

    /// Assemble one outbound request from a body and an override fragment.
    ///
    /// An empty body selects GET with no payload; anything else selects POST
    /// with the body verbatim. The fixed set (`Authorization`, `Accept`,
    /// `Content-Type`) is always present; headers decoded from a non-blank
    /// override fragment are appended after it, additively. An unparsable
    /// fragment aborts the whole build: no partial request is returned.
    pub fn build_request(&self, body: &str, overrides: &str) -> Result<HttpRequest, ApiError> {
        let mut headers = vec![
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.endpoint.api_key),
            ),
            ("Accept".to_string(), "text/event-stream".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];

        let fragment = overrides.trim();
        if !fragment.is_empty() {
            headers.extend(overrides::parse_fragment(fragment)?);
        }

        let (method, body) = if body.is_empty() {
            (HttpMethod::Get, None)
        } else {
            (HttpMethod::Post, Some(body.to_string()))
        };

        Ok(HttpRequest {
            method,
            url: self.endpoint.api_url.clone(),
            headers,
            body,
        })
    }

    /// Send a request and block until status and headers are available.
    ///
    /// Returns the response handle only for status 200 exactly; any other
    /// status, including other 2xx/3xx codes, yields [`ApiError::Status`].
    /// The returned stream owns the connection; drop it when done reading.
    pub fn send(&self, body: &str, overrides: &str) -> Result<StreamResponse, ApiError> {
        let request = self.build_request(body, overrides)?;
        tracing::debug!(url = %request.url, method = ?request.method, "dispatching request");

        let response = dispatch(&self.agent, request).map_err(ApiError::Transport)?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(ApiError::Status(status));
        }
        Ok(StreamResponse::new(
            status,
            Box::new(response.into_body().into_reader()),
        ))
    }

    /// Send a request without waiting for, or ever observing, the outcome.
    ///
    /// The request is still built synchronously, so an unparsable override
    /// fragment surfaces as [`ApiError::Configuration`] here. Once
    /// dispatched, transport failures and non-200 statuses are invisible to
    /// the caller: this is best-effort notification, not guaranteed
    /// delivery.
    pub fn send_async(&self, body: &str, overrides: &str) -> Result<(), ApiError> {
        let request = self.build_request(body, overrides)?;
        tracing::debug!(url = %request.url, "dispatching fire-and-forget request");

        let agent = self.agent.clone();
        thread::spawn(move || {
            if let Err(e) = dispatch(&agent, request) {
                // Swallowed on purpose; the caller opted out of delivery
                // confirmation.
                tracing::debug!(error = %e, "fire-and-forget request failed");
            }
        });
        Ok(())
    }
}

/// Map a plain-data request onto the agent and execute it.
fn dispatch(
    agent: &ureq::Agent,
    request: HttpRequest,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match request.method {
        HttpMethod::Get => {
            let mut call = agent.get(&request.url);
            for (name, value) in &request.headers {
                call = call.header(name.as_str(), value.as_str());
            }
            call.call()
        }
        HttpMethod::Post => {
            let mut call = agent.post(&request.url);
            for (name, value) in &request.headers {
                call = call.header(name.as_str(), value.as_str());
            }
            call.send(request.body.as_deref().unwrap_or_default().as_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> CompletionClient {
        CompletionClient::new(Endpoint {
            api_url: "http://localhost:3000/v1/completions".to_string(),
            api_key: "secret-key".to_string(),
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        })
    }

    fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
        req.headers
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn empty_body_selects_get_without_payload() {
        let req = client().build_request("", "").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());
    }

    #[test]
    fn non_empty_body_selects_post_with_exact_payload() {
        let req = client().build_request(r#"{"prompt":"hi"}"#, "").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some(r#"{"prompt":"hi"}"#));
    }

    #[test]
    fn fixed_headers_are_always_present() {
        let req = client().build_request("", "").unwrap();
        assert_eq!(header(&req, "Authorization"), Some("Bearer secret-key"));
        assert_eq!(header(&req, "Accept"), Some("text/event-stream"));
        assert_eq!(header(&req, "Content-Type"), Some("application/json"));
        assert_eq!(req.headers.len(), 3);
    }

    #[test]
    fn whitespace_only_fragment_adds_nothing() {
        let req = client().build_request("", "  \n\t ").unwrap();
        assert_eq!(req.headers.len(), 3);
    }

    #[test]
    fn json_overrides_are_appended_after_fixed_set() {
        let req = client().build_request("", r#""X-Trace": "abc""#).unwrap();
        assert_eq!(req.headers.len(), 4);
        assert_eq!(req.headers[3], ("X-Trace".to_string(), "abc".to_string()));
        // The fixed set is untouched.
        assert_eq!(header(&req, "Authorization"), Some("Bearer secret-key"));
    }

    #[test]
    fn toml_overrides_fall_back_silently() {
        let req = client()
            .build_request(r#"{"prompt":"hi"}"#, r#"X-Trace = "abc""#)
            .unwrap();
        assert_eq!(header(&req, "X-Trace"), Some("abc"));
        assert_eq!(req.method, HttpMethod::Post);
    }

    #[test]
    fn unparsable_fragment_aborts_the_build() {
        let err = client().build_request("", "}{ nonsense").unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn each_build_produces_a_fresh_request() {
        let c = client();
        let a = c.build_request("", r#""X-One": "1""#).unwrap();
        let b = c.build_request("", "").unwrap();
        assert_eq!(a.headers.len(), 4);
        assert_eq!(b.headers.len(), 3);
    }
}
