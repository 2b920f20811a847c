//! Error pages sent back to the client
//!
//! Only two conditions ever produce a response from the proxy itself:
//! a URI that fails decomposition (400) and a method other than GET
//! (501). Connect and relay failures close the client connection
//! without a response.

use super::CRLF;
use bytes::{BufMut, Bytes, BytesMut};

/// Serialize a minimal HTML error response
///
/// The body is built first so the Content-length header can state its
/// exact byte length.
pub fn client_error(code: u16, short_msg: &str, long_msg: &str, cause: &str) -> Bytes {
    let body = format!(
        "<html><title>Proxy Error</title><body bgcolor=\"ffffff\">\r\n\
         {code}: {short_msg}\r\n\
         <p>{long_msg}: {cause}\r\n\
         <hr><em>The miniproxy server</em>\r\n\
         </body></html>"
    );

    let mut wire = BytesMut::with_capacity(256 + body.len());

    wire.put_slice(format!("HTTP/1.0 {} {}", code, short_msg).as_bytes());
    wire.put_slice(CRLF.as_bytes());
    wire.put_slice(b"Content-type: text/html");
    wire.put_slice(CRLF.as_bytes());
    wire.put_slice(format!("Content-length: {}", body.len()).as_bytes());
    wire.put_slice(CRLF.as_bytes());
    wire.put_slice(CRLF.as_bytes());
    wire.put_slice(body.as_bytes());

    wire.freeze()
}

/// 400 response for a URI that failed decomposition
pub fn bad_request(uri: &str) -> Bytes {
    client_error(400, "Bad Request", "Could not parse the request URI", uri)
}

/// 501 response for any method other than GET
pub fn not_implemented(method: &str) -> Bytes {
    client_error(
        501,
        "Not Implemented",
        "The proxy does not implement this method",
        method,
    )
}
