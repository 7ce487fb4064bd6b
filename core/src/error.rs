//! Error types for the completion API client.
//!
//! # Design
//! The three variants separate the questions a caller actually branches on:
//! "did I misconfigure the request" (`Configuration`), "did the network
//! exchange fail" (`Transport`), and "did the server refuse" (`Status`).
//! Status codes are carried raw — interpreting 401 vs 429 vs 500 is the
//! caller's job, not this crate's.

use std::fmt;

/// Errors returned by [`CompletionClient`](crate::CompletionClient).
#[derive(Debug)]
pub enum ApiError {
    /// The header-override fragment could not be parsed as either JSON or
    /// TOML, so no request was built or sent. The message carries the JSON
    /// failure first (the common dialect), then the TOML failure.
    Configuration(String),

    /// The exchange itself failed: connection refused, timeout, TLS error,
    /// protocol error. The underlying cause is available via `source()`.
    Transport(ureq::Error),

    /// The exchange completed but the server returned a non-200 status.
    /// Only exactly 200 counts as success; no other 2xx/3xx does.
    Status(u16),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Configuration(msg) => {
                write!(f, "invalid header overrides: {msg}")
            }
            ApiError::Transport(e) => write!(f, "request failed: {e}"),
            ApiError::Status(code) => {
                write!(f, "request failed with status code {code}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            _ => None,
        }
    }
}
