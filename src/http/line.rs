//! Buffered line reading from the client session
//!
//! The client side of a transaction is consumed line by line: one
//! request line, then headers up to the blank-line terminator. The
//! reader keeps an incremental buffer and hands out CRLF-delimited
//! lines as they complete.

use super::session::{Session, SessionOps};
use super::{Error, Result, MAX_LINE};
use log::debug;

/// Read buffer growth increment
const READ_CHUNK: usize = 4096;

/// Find the next CRLF in a buffer
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Line-oriented reader over a session
pub struct LineReader<S: SessionOps> {
    session: Session<S>,
    buffer: Vec<u8>,
}

impl<S: SessionOps> LineReader<S> {
    /// Create a new line reader owning the session
    pub fn new(session: S) -> Self {
        LineReader {
            session: Session::new(session),
            buffer: Vec::with_capacity(READ_CHUNK),
        }
    }

    /// Read the next line, without its CRLF terminator
    ///
    /// Returns Ok(None) at end of input. A final line that the peer
    /// never terminated is returned once before the None. A line still
    /// unterminated past `MAX_LINE` bytes ends the transaction instead
    /// of buffering without bound.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(crlf_pos) = find_crlf(&self.buffer) {
                let line = String::from_utf8_lossy(&self.buffer[..crlf_pos]).to_string();
                self.buffer.drain(..crlf_pos + 2);
                return Ok(Some(line));
            }

            if self.buffer.len() > MAX_LINE {
                return Err(Error::Malformed(format!(
                    "line exceeds {} bytes",
                    MAX_LINE
                )));
            }

            let mut temp = vec![0u8; READ_CHUNK];
            let n = self.session.read(&mut temp)?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = String::from_utf8_lossy(&self.buffer).to_string();
                self.buffer.clear();
                return Ok(Some(line));
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }

    /// Consume and discard client headers up to the blank line
    ///
    /// Each header is logged, never stored or forwarded. End of input
    /// before the blank line is an early termination, not an error.
    pub fn drain_headers(&mut self) -> Result<()> {
        while let Some(line) = self.read_line()? {
            if line.is_empty() {
                break;
            }
            debug!("discarding client header: {}", line);
        }

        Ok(())
    }

    /// Get a mutable reference to the underlying session
    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }
}
