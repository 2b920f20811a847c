//! HTTP request line types
//!
//! The proxy only ever inspects the first line of the client's
//! request. Everything after it is drained and discarded, and the
//! origin's response is never parsed at all, so this is the whole of
//! the message model.

use super::{Error, Result};
use std::fmt;

/// HTTP version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    Http10,
    Http11,
}

impl Version {
    /// Parse version from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "HTTP/1.0" => Ok(Version::Http10),
            "HTTP/1.1" => Ok(Version::Http11),
            _ => Err(Error::InvalidVersion(s.to_string())),
        }
    }

    /// Convert version to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed request line
///
/// The method is kept as the raw token rather than an enum: anything
/// other than GET is answered with a 501 naming the token, so there is
/// no value in enumerating methods the proxy will never serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    uri: String,
    version: Version,
}

impl RequestLine {
    /// Parse a request line
    ///
    /// Format: METHOD URI VERSION
    /// Example: GET http://example.com/ HTTP/1.1
    pub fn parse(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.len() != 3 {
            return Err(Error::Malformed(format!(
                "expected 3 parts, got {}",
                parts.len()
            )));
        }

        let version = Version::from_str(parts[2])?;

        Ok(RequestLine {
            method: parts[0].to_string(),
            uri: parts[1].to_string(),
            version,
        })
    }

    /// The method token as the client sent it
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request URI, expected to be in absolute form
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The client's HTTP version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether the method is GET, compared case-insensitively
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.uri, self.version)
    }
}
