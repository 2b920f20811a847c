//! miniproxy - a sequential forward HTTP proxy
//!
//! This crate implements a minimal forward proxy for HTTP/1.x GET
//! requests with absolute-form URIs. Each accepted connection is one
//! transaction: the request line is parsed, the URI is decomposed into
//! (host, port, path), the client's headers are drained, a fresh
//! outbound request is sent to the origin, and the origin's response
//! bytes are relayed back unmodified.

pub mod http;
pub mod net;
pub mod proxy;
