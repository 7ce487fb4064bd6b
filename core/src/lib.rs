//! HTTP request layer for a remote streaming completion API.
//!
//! # Overview
//! Builds authenticated requests (bearer token, `text/event-stream` accept,
//! JSON content type), merges user-supplied header overrides written in
//! either JSON-fragment or TOML-fragment syntax, and dispatches them either
//! blocking (returning the status plus an undrained body stream) or
//! fire-and-forget (outcome discarded by design).
//!
//! # Design
//! - `CompletionClient` holds an immutable [`Endpoint`] and is stateless
//!   between calls; several clients for different endpoints can coexist.
//! - Request assembly is split from dispatch: `build_request` yields a
//!   plain-data [`HttpRequest`], so method selection and header merging are
//!   testable without a network.
//! - Errors are classified by what the caller branches on: configuration
//!   (bad overrides), transport (the exchange failed), status (the server
//!   answered with non-200).
//! - No retries and no response-body interpretation happen here; both are
//!   caller concerns.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod overrides;

pub use client::CompletionClient;
pub use config::Endpoint;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, StreamResponse};
