//! # Telnet session transport
//!
//! [`Session`] is the single persistent byte stream to the remote service. It offers the two
//! primitives the dialogue is written against (see [`Transport`]):
//!
//! * [`Transport::send`] writes text verbatim,
//! * [`Transport::read_until`] blocks until a marker substring shows up in the cumulative
//!   inbound data, or a timeout elapses.
//!
//! Option negotiation is handled inline with the read path: every inbound
//! `IAC <verb> <option>` is decoded by [`TelnetDecoder`] and answered immediately through the
//! [`OptionNegotiator`], and never reaches the caller as data.
//!
//! ## Execution model
//!
//! The socket is a tokio [`TcpStream`] driven by a private current-thread runtime, so the
//! public API stays synchronous and blocking: one connection, one wait at a time, and the only
//! cancellation is timeout expiry. The timeout bounds the reads only, never a write in
//! progress. A timed-out wait keeps everything already received in the buffer and leaves the
//! connection open; the caller decides whether to close it.
//!
//! ## Lifetime
//!
//! [`Session::close`] is idempotent and also runs on drop, so the remote session slot is
//! released on every exit path.
use std::time::Duration;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    runtime::Runtime,
    time::Instant,
};
use tracing::{debug, info, trace};

use crate::horizons_errors::HorizonsError;

use super::{decoder::TelnetDecoder, negotiation::OptionNegotiator};

const READ_CHUNK: usize = 4096;

/// Blocking text transport the dialogue runs on.
pub trait Transport {
    /// Write `text` verbatim to the remote.
    fn send(&mut self, text: &str) -> Result<(), HorizonsError>;

    /// Wait until `marker` appears in the inbound stream.
    ///
    /// Return
    /// ------
    /// * every byte received since the previous successful call, up to and including the
    ///   first occurrence of `marker`; anything after it stays buffered
    /// * `HorizonsError::Timeout` when `timeout` elapses first
    fn read_until(&mut self, marker: &str, timeout: Duration) -> Result<String, HorizonsError>;

    /// Release the connection. Calling it more than once is a no-op.
    fn close(&mut self);
}

pub struct Session {
    runtime: Runtime,
    stream: Option<TcpStream>,
    decoder: TelnetDecoder,
    negotiator: OptionNegotiator,
    buffer: Vec<u8>,
    peer: String,
}

impl Session {
    /// Connect with the default negotiator and a 30 s connect bound.
    pub fn open(host: &str, port: u16) -> Result<Self, HorizonsError> {
        Session::open_with(
            host,
            port,
            OptionNegotiator::default(),
            Duration::from_secs(30),
        )
    }

    /// Connect to `host:port`.
    ///
    /// Arguments
    /// ---------
    /// * `host`, `port`: the remote telnet endpoint
    /// * `negotiator`: answers the option requests received on this connection
    /// * `connect_timeout`: bound on the TCP connection establishment
    ///
    /// Return
    /// ------
    /// * a connected session, or `HorizonsError::Connection` / `ConnectTimeout`
    pub fn open_with(
        host: &str,
        port: u16,
        negotiator: OptionNegotiator,
        connect_timeout: Duration,
    ) -> Result<Self, HorizonsError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let stream = runtime
            .block_on(async {
                tokio::time::timeout(connect_timeout, TcpStream::connect((host, port))).await
            })
            .map_err(|_| HorizonsError::ConnectTimeout {
                host: host.to_string(),
                port,
                timeout: connect_timeout,
            })?
            .map_err(|source| HorizonsError::Connection {
                host: host.to_string(),
                port,
                source,
            })?;

        let peer = format!("{host}:{port}");
        info!(peer = %peer, "telnet session opened");

        Ok(Session {
            runtime,
            stream: Some(stream),
            decoder: TelnetDecoder::new(),
            negotiator,
            buffer: Vec::new(),
            peer,
        })
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Take everything up to and including the first occurrence of `marker`, if present.
    fn take_through(buffer: &mut Vec<u8>, marker: &[u8]) -> Option<String> {
        let end = find(buffer, marker)? + marker.len();
        let rest = buffer.split_off(end);
        let found = std::mem::replace(buffer, rest);
        Some(String::from_utf8_lossy(&found).into_owned())
    }
}

/// Read from `stream` until `marker` is buffered, answering negotiation on the way.
///
/// Only the reads are bounded by `timeout`: a negotiation reply, once started, is always
/// written whole so the remote never sees a truncated `IAC` sequence.
async fn fill_until(
    stream: &mut TcpStream,
    decoder: &mut TelnetDecoder,
    negotiator: &OptionNegotiator,
    buffer: &mut Vec<u8>,
    marker: &str,
    timeout: Duration,
) -> Result<String, HorizonsError> {
    let deadline = Instant::now() + timeout;
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = tokio::time::timeout_at(deadline, stream.read(&mut chunk))
            .await
            .map_err(|_| HorizonsError::Timeout {
                marker: marker.to_string(),
                timeout,
            })??;
        if n == 0 {
            return Err(HorizonsError::ConnectionClosed {
                marker: marker.to_string(),
            });
        }
        trace!(bytes = n, "received chunk");

        for event in decoder.decode(&chunk[..n], buffer) {
            let reply = negotiator.respond(event);
            debug!(%event, reply = ?reply, "option negotiation");
            if !reply.is_empty() {
                stream.write_all(&reply).await?;
            }
        }

        if let Some(found) = Session::take_through(buffer, marker.as_bytes()) {
            return Ok(found);
        }
    }
}

/// Position of the first occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

impl Transport for Session {
    fn send(&mut self, text: &str) -> Result<(), HorizonsError> {
        let Session {
            runtime, stream, ..
        } = self;
        let stream = stream.as_mut().ok_or(HorizonsError::NotConnected)?;

        debug!(text = ?text, "send");
        runtime.block_on(async {
            stream.write_all(text.as_bytes()).await?;
            stream.flush().await
        })?;
        Ok(())
    }

    fn read_until(&mut self, marker: &str, timeout: Duration) -> Result<String, HorizonsError> {
        if self.stream.is_none() {
            return Err(HorizonsError::NotConnected);
        }
        if let Some(found) = Session::take_through(&mut self.buffer, marker.as_bytes()) {
            return Ok(found);
        }

        let Session {
            runtime,
            stream,
            decoder,
            negotiator,
            buffer,
            ..
        } = self;
        let stream = stream.as_mut().ok_or(HorizonsError::NotConnected)?;

        runtime.block_on(fill_until(
            stream, decoder, negotiator, buffer, marker, timeout,
        ))
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            // best effort: the remote may already be gone
            let _ = self.runtime.block_on(stream.shutdown());
            info!(peer = %self.peer, "telnet session closed");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
