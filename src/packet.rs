//! Wire format for the exchange protocol.
//!
//! Requests are two bytes: a kind byte (1 = stream everything, 2 = resend a
//! single packet) followed by a single-byte sequence number (0 for kind 1).
//! Responses are a run of fixed 17-byte records, big-endian integers:
//!
//! ```text
//! offset  size  field
//!      0     4  symbol (fixed-width text, NUL/space padded)
//!      4     1  side indicator character
//!      5     4  quantity, i32
//!      9     4  price, i32
//!     13     4  sequence, i32
//! ```
//!
//! The server writes records back-to-back with no framing of its own, so a
//! TCP read can end anywhere inside a record. [`FrameDecoder`] keeps the
//! trailing partial record as carry-over between chunks; decoding in place
//! per read would silently misalign everything after the first split record.

use serde::{Deserialize, Serialize};

/// Size of one response record on the wire.
pub const RECORD_LEN: usize = 17;

/// One decoded trade packet. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub symbol: String,
    pub side: char,
    pub quantity: i32,
    pub price: i32,
    pub sequence: i32,
}

/// The two request types the protocol defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Stream every packet from the beginning; server closes when done.
    StreamAll,
    /// Resend exactly one packet. The wire field is a single byte, which is
    /// why the variant carries a `u8` and not a full sequence number.
    ResendOne(u8),
}

impl Request {
    pub fn encode(self) -> [u8; 2] {
        match self {
            Request::StreamAll => [1, 0],
            Request::ResendOne(seq) => [2, seq],
        }
    }
}

/// Decode one record from a slice of exactly [`RECORD_LEN`] bytes.
///
/// Never fails on a well-formed 17-byte slice; the caller guarantees the
/// length. Trailing NUL/space padding is trimmed from the symbol.
pub fn decode_record(rec: &[u8]) -> Packet {
    debug_assert_eq!(rec.len(), RECORD_LEN);
    let read_i32 = |b: &[u8]| -> i32 {
        let mut tmp = [0u8; 4];
        tmp.copy_from_slice(&b[..4]);
        i32::from_be_bytes(tmp)
    };
    let symbol = String::from_utf8_lossy(&rec[0..4])
        .trim_end_matches(['\0', ' '])
        .to_string();
    Packet {
        symbol,
        side: char::from(rec[4]),
        quantity: read_i32(&rec[5..9]),
        price: read_i32(&rec[9..13]),
        sequence: read_i32(&rec[13..17]),
    }
}

/// Incremental record decoder with an explicit carry-over buffer.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    carry: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self { carry: Vec::with_capacity(RECORD_LEN) }
    }

    /// Feed one chunk of arbitrary length; returns every record completed by
    /// it. The trailing partial record (0 to 16 bytes) stays buffered.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Packet> {
        self.carry.extend_from_slice(chunk);
        let complete = self.carry.len() / RECORD_LEN * RECORD_LEN;
        let out = self.carry[..complete]
            .chunks_exact(RECORD_LEN)
            .map(decode_record)
            .collect();
        self.carry.drain(..complete);
        out
    }

    /// Bytes of a partial record still buffered. Non-zero at end-of-stream
    /// means the server closed mid-record; the caller reports and discards.
    pub fn pending(&self) -> usize {
        self.carry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record_bytes(symbol: &str, side: char, quantity: i32, price: i32, sequence: i32) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(RECORD_LEN);
        let mut sym = [0u8; 4];
        sym[..symbol.len()].copy_from_slice(symbol.as_bytes());
        bytes.extend_from_slice(&sym);
        bytes.push(side as u8);
        bytes.extend_from_slice(&quantity.to_be_bytes());
        bytes.extend_from_slice(&price.to_be_bytes());
        bytes.extend_from_slice(&sequence.to_be_bytes());
        bytes
    }

    #[test]
    fn decode_single_record() {
        let bytes = record_bytes("MSFT", 'B', 50, 100, 7);
        let p = decode_record(&bytes);
        assert_eq!(p, Packet { symbol: "MSFT".into(), side: 'B', quantity: 50, price: 100, sequence: 7 });
    }

    #[test]
    fn symbol_padding_trimmed() {
        let nul_padded = record_bytes("AB", 'S', 1, 2, 3);
        assert_eq!(decode_record(&nul_padded).symbol, "AB");

        let mut space_padded = record_bytes("AB", 'S', 1, 2, 3);
        space_padded[2] = b' ';
        space_padded[3] = b' ';
        assert_eq!(decode_record(&space_padded).symbol, "AB");
    }

    #[test]
    fn negative_integers_decode() {
        let bytes = record_bytes("TST", 'S', -5, -100, 1);
        let p = decode_record(&bytes);
        assert_eq!(p.quantity, -5);
        assert_eq!(p.price, -100);
    }

    #[test]
    fn record_split_across_chunks() {
        let bytes = record_bytes("AAPL", 'B', 10, 250, 1);
        let mut dec = FrameDecoder::new();
        assert!(dec.push(&bytes[..9]).is_empty());
        assert_eq!(dec.pending(), 9);
        let out = dec.push(&bytes[9..]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sequence, 1);
        assert_eq!(dec.pending(), 0);
    }

    #[test]
    fn multiple_records_one_chunk_plus_tail() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&record_bytes("AAPL", 'B', 1, 1, 1));
        stream.extend_from_slice(&record_bytes("AAPL", 'S', 2, 2, 2));
        stream.extend_from_slice(&record_bytes("AAPL", 'B', 3, 3, 3)[..5]);

        let mut dec = FrameDecoder::new();
        let out = dec.push(&stream);
        assert_eq!(out.iter().map(|p| p.sequence).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(dec.pending(), 5);
    }

    #[test]
    fn empty_chunk_is_noop() {
        let mut dec = FrameDecoder::new();
        assert!(dec.push(&[]).is_empty());
        assert_eq!(dec.pending(), 0);
    }

    #[test]
    fn request_encoding() {
        assert_eq!(Request::StreamAll.encode(), [1, 0]);
        assert_eq!(Request::ResendOne(42).encode(), [2, 42]);
        assert_eq!(Request::ResendOne(255).encode(), [2, 255]);
    }

    proptest! {
        /// Decoding must not depend on where TCP reads happen to end: any
        /// chunking of the same byte stream yields the same records.
        #[test]
        fn chunking_is_boundary_independent(cuts in proptest::collection::vec(0usize..=85, 0..8)) {
            let mut cuts = cuts;
            let mut stream = Vec::new();
            for seq in 1..=5 {
                stream.extend_from_slice(&record_bytes("AAPL", 'B', seq, seq * 10, seq));
            }
            assert_eq!(stream.len(), 85);

            let mut whole = FrameDecoder::new();
            let expected = whole.push(&stream);

            cuts.sort_unstable();
            cuts.dedup();
            let mut dec = FrameDecoder::new();
            let mut got = Vec::new();
            let mut start = 0;
            for cut in cuts {
                got.extend(dec.push(&stream[start..cut]));
                start = cut;
            }
            got.extend(dec.push(&stream[start..]));

            prop_assert_eq!(got, expected);
            prop_assert_eq!(dec.pending(), 0);
        }
    }
}
