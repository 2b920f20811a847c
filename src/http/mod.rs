//! HTTP/1.x support for the proxy
//!
//! This module holds the protocol-level pieces of the relay pipeline:
//! request line parsing, absolute-URI decomposition, client header
//! draining, outbound request construction, and the error pages sent
//! back to the client.
//!
//! # Architecture
//!
//! All I/O goes through the session operations abstraction:
//!
//! - `SessionOps` trait defines operations (poll, read, write, close)
//! - `Session` wraps a transport and adds an optional timeout plus a
//!   full-write loop
//! - the rest of the HTTP code is transparent to the underlying
//!   transport

pub mod line;
pub mod message;
pub mod request;
pub mod response;
pub mod session;
pub mod uri;

pub use line::LineReader;
pub use message::{RequestLine, Version};
pub use request::OutboundRequest;
pub use session::{FdSessionOps, Session, SessionOps};
pub use uri::Target;

/// Result type for proxy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Proxy operation errors
///
/// Every variant is local to a single transaction; nothing here is
/// allowed to terminate the accept loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URI does not use the http scheme: {0}")]
    BadScheme(String),

    #[error("URI has an empty host: {0}")]
    BadHost(String),

    #[error("malformed request line: {0}")]
    Malformed(String),

    #[error("invalid HTTP version: {0}")]
    InvalidVersion(String),

    #[error("method not implemented: {0}")]
    UnsupportedMethod(String),

    #[error("connect to origin failed: {0}")]
    ConnectFailed(String),

    #[error("timeout")]
    Timeout,

    #[error("connection closed")]
    ConnectionClosed,
}

/// Default port for origin connections when the URI names none
pub const DEFAULT_HTTP_PORT: &str = "80";

/// Longest accepted request or header line, in bytes
pub const MAX_LINE: usize = 8192;

/// Chunk size for the origin-to-client relay loop
pub const RELAY_CHUNK_SIZE: usize = 8192;

/// CRLF line ending
pub const CRLF: &str = "\r\n";
