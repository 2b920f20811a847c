//! Absolute-form URI decomposition
//!
//! A proxy request names its destination in the request line as an
//! absolute-form URI (`http://host[:port][/path]`). This module breaks
//! such a URI into the (host, port, path) triple the rest of the
//! pipeline works with.

use super::{Error, Result, DEFAULT_HTTP_PORT};

/// Scheme prefix required on every proxied URI
const SCHEME_PREFIX: &str = "http://";

/// Characters that terminate the host span
const HOST_DELIMITERS: [char; 5] = [' ', ':', '/', '\r', '\n'];

/// Characters that terminate the port span
const PORT_DELIMITERS: [char; 3] = ['/', '\r', '\n'];

/// The decomposed destination of one proxied request
///
/// Invariants on a successfully built `Target`: the host is non-empty
/// and the path begins with `/`. The port is kept as a string because
/// it travels verbatim into the `Host` header and the connect address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    host: String,
    port: String,
    path: String,
}

impl Target {
    /// Decompose an absolute-form URI into host, port, and path
    ///
    /// The URI must begin with a case-insensitive `http://`. The host
    /// runs to the first of space, `:`, `/`, CR, LF, or end of input;
    /// an empty host span is an error. A `:` directly after the host
    /// introduces the port, which runs to the next `/`, CR, LF, or end
    /// of input; without one the port defaults to 80. The path starts
    /// at the first `/` after the scheme and defaults to `/`.
    pub fn decompose(uri: &str) -> Result<Self> {
        let scheme = uri
            .get(..SCHEME_PREFIX.len())
            .ok_or_else(|| Error::BadScheme(uri.to_string()))?;
        if !scheme.eq_ignore_ascii_case(SCHEME_PREFIX) {
            return Err(Error::BadScheme(uri.to_string()));
        }

        let rest = &uri[SCHEME_PREFIX.len()..];

        let host_end = rest.find(HOST_DELIMITERS).unwrap_or(rest.len());
        if host_end == 0 {
            return Err(Error::BadHost(uri.to_string()));
        }
        let host = &rest[..host_end];

        let port = if rest[host_end..].starts_with(':') {
            let after_colon = &rest[host_end + 1..];
            let port_end = after_colon.find(PORT_DELIMITERS).unwrap_or(after_colon.len());
            &after_colon[..port_end]
        } else {
            DEFAULT_HTTP_PORT
        };

        let path = match rest.find('/') {
            Some(slash) => &rest[slash..],
            None => "/",
        };

        Ok(Target {
            host: host.to_string(),
            port: port.to_string(),
            path: path.to_string(),
        })
    }

    /// Hostname of the origin server
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port of the origin server, as it appeared in the URI
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Request path, always beginning with `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `host:port` form used for the Host header and the connect address
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
