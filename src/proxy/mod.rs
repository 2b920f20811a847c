//! Transaction orchestration
//!
//! One `Transaction` per accepted connection. The flow is a straight
//! line with terminal exits: read the request line, check the method,
//! decompose the URI, drain the client's headers, then hand off to the
//! relay driver. Whatever happens, both sockets are gone when `serve`
//! returns: the client via the session drop plus an explicit shutdown,
//! the origin inside the relay.

pub mod relay;

use crate::http::session::SessionOps;
use crate::http::{response, Error, LineReader, OutboundRequest, RequestLine, Result, Target};
use log::{debug, info};

/// One client connection's request/response lifecycle
pub struct Transaction<S: SessionOps> {
    client: LineReader<S>,
}

impl<S: SessionOps> Transaction<S> {
    /// Create a transaction for an accepted client session
    pub fn new(session: S) -> Self {
        Transaction {
            client: LineReader::new(session),
        }
    }

    /// Drive the transaction to completion
    ///
    /// Every failure ends this transaction and nothing else. Only a
    /// bad method (501) and a bad URI (400) produce a response; a
    /// malformed request line, connect failure, or I/O error closes
    /// the connection silently.
    pub fn serve(mut self) -> Result<()> {
        let result = self.run();

        // A response write can fail if the client is already gone;
        // that changes nothing about how the transaction ends.
        match &result {
            Err(Error::UnsupportedMethod(method)) => {
                let _ = self.respond(&response::not_implemented(method));
            }
            Err(Error::BadScheme(uri)) | Err(Error::BadHost(uri)) => {
                let _ = self.respond(&response::bad_request(uri));
            }
            _ => {}
        }

        // The client socket must go down on every exit path.
        let _ = self.client.session_mut().close();

        result
    }

    fn run(&mut self) -> Result<()> {
        let line = match self.client.read_line()? {
            Some(line) => line,
            None => {
                debug!("client closed before sending a request line");
                return Ok(());
            }
        };

        let request = RequestLine::parse(&line).map_err(|e| {
            debug!("rejecting request line {:?}: {}", line, e);
            e
        })?;

        info!(":: {} ::", request);

        if !request.is_get() {
            return Err(Error::UnsupportedMethod(request.method().to_string()));
        }

        let target = Target::decompose(request.uri())?;

        self.client.drain_headers()?;

        let outbound = OutboundRequest::new(target.clone()).to_wire();
        relay::relay(&target, &outbound, self.client.session_mut())
    }

    fn respond(&mut self, wire: &[u8]) -> Result<()> {
        self.client.session_mut().write_all(wire)
    }
}
