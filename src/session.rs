//! Blocking TCP session against the exchange server.
//!
//! One run moves through: connect and stream everything (with a single
//! reconnect-and-restart if the connection drops mid-stream), then one
//! short-lived connection per missing sequence number. Strictly sequential;
//! one connection is open at a time, and every connection closes on every
//! exit path when the `TcpStream` drops.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{FeedError, Result};
use crate::packet::{FrameDecoder, Request, RECORD_LEN, decode_record};
use crate::store::PacketStore;

const READ_BUF_LEN: usize = 1024;

pub struct SessionClient {
    addr: String,
    read_timeout: Option<Duration>,
}

impl SessionClient {
    pub fn new(host: &str, port: u16) -> Self {
        Self { addr: format!("{host}:{port}"), read_timeout: None }
    }

    /// Apply a read deadline to every connection. Without one, a silent
    /// server stalls the run indefinitely.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    fn connect(&self) -> Result<TcpStream> {
        let stream = TcpStream::connect(&self.addr)?;
        stream.set_read_timeout(self.read_timeout)?;
        Ok(stream)
    }

    /// Request the full packet stream and decode it into `store`.
    ///
    /// If the connection drops mid-stream ([`FeedError::Disconnected`]), the
    /// whole stream is requested again over a fresh connection, exactly once;
    /// packets re-received on the second pass collapse via store idempotence.
    /// Any other transport error, or a drop during the retry, is terminal.
    pub fn stream_all(&self, store: &mut PacketStore) -> Result<()> {
        match self.stream_once(store) {
            Err(FeedError::Disconnected(e)) => {
                warn!(error = %e, "connection dropped mid-stream, reconnecting once");
                self.stream_once(store)
            }
            other => other,
        }
    }

    fn stream_once(&self, store: &mut PacketStore) -> Result<()> {
        let mut stream = self.connect()?;
        info!(addr = %self.addr, "connected, requesting full stream");
        stream.write_all(&Request::StreamAll.encode())?;

        let mut decoder = FrameDecoder::new();
        let mut buf = [0u8; READ_BUF_LEN];
        loop {
            let n = stream.read(&mut buf)?;
            if n == 0 {
                break;
            }
            for packet in decoder.push(&buf[..n]) {
                debug!(sequence = packet.sequence, symbol = %packet.symbol, "received packet");
                store.add(packet);
            }
        }
        if decoder.pending() > 0 {
            warn!(
                bytes = decoder.pending(),
                "stream ended mid-record, discarding dangling partial record"
            );
        }
        info!(packets = store.len(), high_water = store.high_water_mark(), "stream ended");
        Ok(())
    }

    /// Request a single missing packet over a short-lived connection.
    ///
    /// The resend wire format carries the sequence number as one byte, so a
    /// gap outside 0-255 is rejected here, before any connection is opened,
    /// instead of being sent truncated. Returns whether a record arrived;
    /// the server answering with nothing is a valid outcome.
    pub fn request_one(&self, sequence: i32, store: &mut PacketStore) -> Result<bool> {
        let seq_byte =
            u8::try_from(sequence).map_err(|_| FeedError::UnaddressableGap(sequence))?;

        let mut stream = self.connect()?;
        debug!(sequence, "requesting resend");
        stream.write_all(&Request::ResendOne(seq_byte).encode())?;

        let mut buf = [0u8; RECORD_LEN];
        let mut filled = 0;
        while filled < RECORD_LEN {
            let n = stream.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        match filled {
            0 => Ok(false),
            RECORD_LEN => {
                store.add(decode_record(&buf));
                Ok(true)
            }
            got => Err(FeedError::TruncatedRecord { got, expected: RECORD_LEN }),
        }
    }
}
