//! Accumulated packet collection for one session.
//!
//! Owned by the session controller and threaded through explicitly; nothing
//! here is process-global, so the decoder and gap logic test in isolation.

use std::collections::BTreeMap;

use crate::packet::Packet;

/// Append-only packet collection keyed by sequence number, plus the largest
/// sequence number observed so far (0 = none yet).
#[derive(Debug, Default)]
pub struct PacketStore {
    packets: BTreeMap<i32, Packet>,
    high_water: i32,
}

impl PacketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a packet and advance the high-water mark.
    ///
    /// Idempotent per sequence number: re-receiving a packet (a restarted
    /// stream, or a backfill answer overlapping the stream) keeps exactly one
    /// entry, first write wins. Returns whether the packet was new.
    pub fn add(&mut self, packet: Packet) -> bool {
        self.high_water = self.high_water.max(packet.sequence);
        let seq = packet.sequence;
        if self.packets.contains_key(&seq) {
            return false;
        }
        self.packets.insert(seq, packet);
        true
    }

    pub fn contains(&self, sequence: i32) -> bool {
        self.packets.contains_key(&sequence)
    }

    /// Largest sequence number observed in any decoded record.
    pub fn high_water_mark(&self) -> i32 {
        self.high_water
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Consume the store, yielding packets ascending by sequence number.
    pub fn into_sorted(self) -> Vec<Packet> {
        self.packets.into_values().collect()
    }
}
