//! Outbound request construction
//!
//! The request sent to the origin is built from scratch for every
//! transaction: the rewritten request line plus a fixed header block.
//! Client-supplied headers never make it through; the proxy always
//! presents itself the same way to the origin.

use super::uri::Target;
use super::CRLF;
use bytes::{BufMut, Bytes, BytesMut};

/// Fixed User-Agent presented to every origin
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:10.0.3) Gecko/20120305 Firefox/10.0.3";

/// The request forwarded to the origin server
///
/// Always `GET {path} HTTP/1.0` followed by Host, User-Agent,
/// Connection: close, and Proxy-Connection: close. Deterministic for a
/// given target.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    target: Target,
}

impl OutboundRequest {
    /// Build the outbound request for a decomposed target
    pub fn new(target: Target) -> Self {
        OutboundRequest { target }
    }

    /// Serialize the request to wire format
    pub fn to_wire(&self) -> Bytes {
        let mut wire = BytesMut::with_capacity(256);

        wire.put_slice(b"GET ");
        wire.put_slice(self.target.path().as_bytes());
        wire.put_slice(b" HTTP/1.0");
        wire.put_slice(CRLF.as_bytes());

        wire.put_slice(b"Host: ");
        wire.put_slice(self.target.authority().as_bytes());
        wire.put_slice(CRLF.as_bytes());

        wire.put_slice(b"User-Agent: ");
        wire.put_slice(USER_AGENT.as_bytes());
        wire.put_slice(CRLF.as_bytes());

        wire.put_slice(b"Connection: close");
        wire.put_slice(CRLF.as_bytes());

        wire.put_slice(b"Proxy-Connection: close");
        wire.put_slice(CRLF.as_bytes());

        wire.put_slice(CRLF.as_bytes());

        wire.freeze()
    }
}
