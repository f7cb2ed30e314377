//! Client for a simple binary market-data protocol.
//!
//! The `exchange_feed` binary connects to a mock exchange over TCP, requests
//! the full trade-packet stream, detects holes in the sequence numbers it
//! observed, recovers each missing packet with a targeted resend request, and
//! writes the de-duplicated, sequence-ordered result as a JSON document.
//!
//! Modules, leaf-first:
//!
//! - `packet`: wire format (fixed 17-byte records, request encoding) and the
//!   carry-over decoder that survives records split across TCP reads
//! - `store`: idempotent packet collection plus the high-water mark
//! - `recover`: gap computation and the sequential backfill loop
//! - `session`: blocking TCP client with reconnect-once on a dropped stream
//! - `export`: JSON document writer for the final sorted collection
//! - `error`: structured transport/decode error classification
pub mod error;
pub mod export;
pub mod packet;
pub mod recover;
pub mod session;
pub mod store;
