//! Connection parameters for one remote completion endpoint.

use std::time::Duration;

/// Immutable endpoint configuration.
///
/// Created once and handed to [`CompletionClient`](crate::CompletionClient)
/// at construction; never mutated afterwards. An injected value rather than
/// global state, so clients for several endpoints can coexist in one
/// process.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Full URL of the completion endpoint, e.g.
    /// `http://localhost:3000/v1/completions`.
    pub api_url: String,
    /// Bearer token sent in the `Authorization` header of every request.
    pub api_key: String,
    /// Maximum time to establish a connection.
    pub connect_timeout: Duration,
    /// Maximum time to wait for the response status and headers. The body
    /// stream is not subject to it; completions may stream for longer.
    pub request_timeout: Duration,
}
