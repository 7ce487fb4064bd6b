//! Plain-data request type and the streaming response handle.
//!
//! # Design
//! `HttpRequest` describes an outbound request as plain data. The client
//! builds one per call without touching the network, which keeps method
//! selection and header assembly deterministic and unit-testable; dispatch
//! happens in a separate step. `StreamResponse` is what a successful
//! dispatch hands back: the status plus a lazily readable body stream.

use std::io::Read;

/// HTTP method for a request. The completion API only ever sees GET (no
/// payload) or POST (JSON payload); the method is inferred from body
/// presence, never chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An outbound request described as plain data.
///
/// Built fresh per call by [`CompletionClient`](crate::CompletionClient);
/// never reused. Headers are ordered: the fixed/auth set first, then any
/// override-supplied entries.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// A successful response: status code plus the undrained body stream.
///
/// The stream is lazy — the server may still be producing it (the API
/// answers with `text/event-stream`). Ownership transfers to the caller,
/// who must drop the handle on every exit path to release the underlying
/// connection.
pub struct StreamResponse {
    status: u16,
    reader: Box<dyn Read + Send>,
}

impl StreamResponse {
    pub(crate) fn new(status: u16, reader: Box<dyn Read + Send>) -> Self {
        Self { status, reader }
    }

    /// Status code of the response. Always 200 on the success path.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Consume the handle and take ownership of the body stream.
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        self.reader
    }
}

impl Read for StreamResponse {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl std::fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
