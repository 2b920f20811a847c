//! TCP listener setup and the sequential accept loop
//!
//! The proxy serves one connection at a time: each accepted stream is
//! handed to the transaction orchestrator and fully processed before
//! the next accept. Accept failures and transaction errors are logged
//! and never stop the loop.

use crate::http::{FdSessionOps, Result};
use crate::proxy::Transaction;
use log::{info, warn};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener, TcpStream};

/// Listen backlog for the proxy socket
const LISTEN_BACKLOG: i32 = 128;

/// The proxy's listening socket
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind a reusable listening socket on the given port
    ///
    /// Port 0 asks the kernel for a free port; `local_addr` reports
    /// the one actually bound.
    pub fn bind(port: u16) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;

        let addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
        socket.bind(&SocketAddr::from(addr).into())?;
        socket.listen(LISTEN_BACKLOG)?;

        Ok(Listener {
            inner: socket.into(),
        })
    }

    /// Accept the next client connection
    pub fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        let (stream, peer) = self.inner.accept()?;
        Ok((stream, peer))
    }

    /// The address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.inner.local_addr()?)
    }
}

/// Serve connections sequentially, forever
///
/// Every failure is scoped to its transaction; the loop itself only
/// logs and moves on to the next accept.
pub fn run(listener: &Listener) -> ! {
    loop {
        let (stream, peer) = match listener.accept() {
            Ok(conn) => conn,
            Err(e) => {
                warn!("accept failed: {}", e);
                continue;
            }
        };

        info!("accepted connection from {}", peer);

        let transaction = Transaction::new(FdSessionOps::new(stream));
        if let Err(e) = transaction.serve() {
            warn!("transaction aborted: {}", e);
        }
    }
}
