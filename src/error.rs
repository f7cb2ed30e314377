//! Error taxonomy for the feed session.
//!
//! Transport failures are classified structurally from the underlying
//! [`std::io::ErrorKind`] rather than by matching error text: a dropped
//! connection (`NotConnected` / `ConnectionReset`) is the one condition the
//! session treats as recoverable during the initial stream.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The connection dropped mid-stream. Recoverable once during the
    /// initial stream; skippable like any other error during backfill.
    #[error("connection dropped: {0}")]
    Disconnected(#[source] io::Error),

    /// Any other transport-level failure (refused, timed out, ...).
    #[error("transport error: {0}")]
    Transport(#[source] io::Error),

    /// A resend response ended before a full record arrived.
    #[error("resend response truncated: got {got} of {expected} bytes")]
    TruncatedRecord { got: usize, expected: usize },

    /// The resend request encodes its sequence number as a single byte, so
    /// gaps above 255 cannot be requested under this protocol.
    #[error("sequence {0} is outside the resend-addressable range 0-255")]
    UnaddressableGap(i32),
}

impl From<io::Error> for FeedError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotConnected | io::ErrorKind::ConnectionReset => {
                FeedError::Disconnected(e)
            }
            _ => FeedError::Transport(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
