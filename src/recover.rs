//! Gap detection and the sequential backfill loop.
//!
//! After the initial stream ends, every sequence number in
//! `[1, high_water_mark]` without a decoded record is a gap. Each gap gets
//! exactly one resend request; a gap that cannot be recovered (no data,
//! truncated data, transport failure, or a sequence number the resend wire
//! format cannot address) is logged and left missing rather than aborting the
//! rest of the loop.

use tracing::{debug, warn};

use crate::session::SessionClient;
use crate::store::PacketStore;

/// Every integer in `[1, high_water]` with no packet present, ascending.
///
/// The top of the range counts: a high-water mark with no record of its own
/// is itself a gap.
pub fn missing_sequences(store: &PacketStore, high_water: i32) -> Vec<i32> {
    (1..=high_water).filter(|seq| !store.contains(*seq)).collect()
}

/// Outcome of one backfill pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    pub recovered: usize,
    /// Gaps still missing after the pass, ascending.
    pub unrecovered: Vec<i32>,
}

/// Request each missing packet once, sequentially.
///
/// The missing set is derived exactly once, before the loop: resend answers
/// return only the requested record, so the high-water mark does not advance
/// mid-backfill.
pub fn backfill(client: &SessionClient, store: &mut PacketStore) -> BackfillSummary {
    let missing = missing_sequences(store, store.high_water_mark());
    let mut summary = BackfillSummary::default();
    for seq in missing {
        match client.request_one(seq, store) {
            Ok(true) => {
                debug!(sequence = seq, "recovered missing packet");
                summary.recovered += 1;
            }
            Ok(false) => {
                warn!(sequence = seq, "server returned no data for missing packet");
                summary.unrecovered.push(seq);
            }
            Err(e) => {
                warn!(sequence = seq, error = %e, "resend request failed, skipping gap");
                summary.unrecovered.push(seq);
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Packet;

    fn packet(sequence: i32) -> Packet {
        Packet { symbol: "TST".into(), side: 'S', quantity: 1, price: 10, sequence }
    }

    #[test]
    fn missing_includes_hole_at_top_of_range() {
        let mut store = PacketStore::new();
        for seq in [1, 2, 4] {
            store.add(packet(seq));
        }
        assert_eq!(missing_sequences(&store, 5), vec![3, 5]);
    }

    #[test]
    fn contiguous_stream_has_no_gaps() {
        let mut store = PacketStore::new();
        for seq in 1..=4 {
            store.add(packet(seq));
        }
        assert_eq!(missing_sequences(&store, store.high_water_mark()), Vec::<i32>::new());
    }

    #[test]
    fn empty_store_has_no_gaps() {
        let store = PacketStore::new();
        assert_eq!(missing_sequences(&store, store.high_water_mark()), Vec::<i32>::new());
    }

    #[test]
    fn missing_set_is_ascending() {
        let mut store = PacketStore::new();
        store.add(packet(6));
        store.add(packet(2));
        assert_eq!(missing_sequences(&store, store.high_water_mark()), vec![1, 3, 4, 5]);
    }
}
