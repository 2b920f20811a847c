//! Relay driver
//!
//! Opens the origin connection, sends the rebuilt request, and copies
//! the origin's response back to the client byte for byte. The relay
//! never interprets what it copies; Content-Length, chunking, and the
//! rest of HTTP framing are opaque here, and the copy ends when the
//! origin closes its side.

use crate::http::session::{FdSessionOps, Session, SessionOps};
use crate::http::{Error, Result, Target, RELAY_CHUNK_SIZE};
use log::debug;
use std::net::TcpStream;

/// Connect to the origin named by the target
///
/// Resolution and connect failures collapse into ConnectFailed: by the
/// time this runs nothing has been written to the client, and nothing
/// will be.
fn connect(target: &Target) -> Result<TcpStream> {
    let authority = target.authority();

    TcpStream::connect(&authority).map_err(|e| {
        debug!("connect to {} failed: {}", authority, e);
        Error::ConnectFailed(authority)
    })
}

/// Forward the outbound request and relay the origin's response
///
/// The client session stays open for the caller to close; the origin
/// connection is scoped to this call.
pub fn relay<S: SessionOps>(
    target: &Target,
    outbound: &[u8],
    client: &mut Session<S>,
) -> Result<()> {
    let mut origin = Session::new(FdSessionOps::new(connect(target)?));

    origin.write_all(outbound)?;

    let mut chunk = [0u8; RELAY_CHUNK_SIZE];
    let mut total = 0usize;

    loop {
        let n = origin.read(&mut chunk)?;
        if n == 0 {
            break;
        }

        client.write_all(&chunk[..n])?;
        total += n;
    }

    debug!("relayed {} bytes from {}", total, target.authority());

    // Shut the origin side down; errors past this point change nothing.
    let _ = origin.close();

    Ok(())
}
