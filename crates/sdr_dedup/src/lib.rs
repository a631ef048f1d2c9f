//! Cross-channel duplicate suppression.
//!
//! Wideband decoding sees the same transmission more than once whenever its
//! energy straddles a channel boundary: the oversampled channelizer hands
//! it to both neighbors, which report it at two different apparent center
//! frequencies. This keeps a short ring of recently-seen record
//! fingerprints and suppresses a record if an equal fingerprint was seen
//! recently on a frequency far enough away to be that same cross-channel
//! echo; a fingerprint match on the same (or a close-by) frequency is a
//! legitimate protocol-level retransmission, not a duplicate, and is
//! forwarded.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

const RING_CAPACITY: usize = 32;
const WINDOW_MS: u64 = 500;
const MIN_FREQ_DIFF_HZ: f64 = 1000.0;

/// A decoded payload field. Mirrors the small set of primitive types a
/// protocol decoder hands back; `Array` carries only shape and element kind
/// since the fingerprint only needs to distinguish "what was decoded", not
/// reproduce it.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Int(i64),
    Float(f64),
    Text(String),
    Array { len: usize, elem_kind: ElemKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemKind {
    Int,
    Float,
    Text,
}

/// One decoded record, as handed from a channel's protocol decoder to the
/// dedup gate before it reaches an external subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub channel: usize,
    pub freq_hz: f64,
    pub timestamp_ms: u64,
    pub values: Vec<DataValue>,
}

/// FNV-1a fingerprint of a record's decoded payload (channel, frequency, and
/// timestamp are deliberately excluded: those are what distinguishes a
/// legitimate repeat from a duplicate, not what identifies one).
pub fn fingerprint(record: &DecodedRecord) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut mix = |bytes: &[u8]| {
        for &b in bytes {
            hash ^= b as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    };
    for value in &record.values {
        match value {
            DataValue::Int(v) => {
                mix(&[0u8]);
                mix(&v.to_le_bytes());
            }
            DataValue::Float(v) => {
                mix(&[1u8]);
                mix(&v.to_le_bytes());
            }
            DataValue::Text(s) => {
                mix(&[2u8]);
                mix(s.as_bytes());
            }
            DataValue::Array { len, elem_kind } => {
                mix(&[3u8, *elem_kind as u8]);
                mix(&(*len as u64).to_le_bytes());
            }
        }
    }
    hash
}

struct Entry {
    hash: u32,
    freq_hz: f64,
    timestamp_ms: u64,
}

/// A 32-entry ring of recent fingerprints, scanned newest-first.
pub struct Dedup {
    ring: Vec<Entry>,
    head: usize,
    suppressed_count: u64,
}

impl Default for Dedup {
    fn default() -> Self {
        Self::new()
    }
}

impl Dedup {
    pub fn new() -> Self {
        Self {
            ring: Vec::with_capacity(RING_CAPACITY),
            head: 0,
            suppressed_count: 0,
        }
    }

    /// Total number of records suppressed as duplicates since construction.
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed_count
    }

    /// Checks `record` against the recent-fingerprint ring. Returns `true`
    /// if the record should pass through to the subscriber, `false` if it
    /// is a duplicate and should be dropped. Either way the record's
    /// fingerprint is recorded for future checks.
    pub fn check(&mut self, record: &DecodedRecord) -> bool {
        let hash = fingerprint(record);
        let now = record.timestamp_ms;

        for i in 0..self.ring.len() {
            let idx = (self.head + RING_CAPACITY - 1 - i) % self.ring.len().max(1);
            let entry = &self.ring[idx];
            if now.saturating_sub(entry.timestamp_ms) > WINDOW_MS {
                continue;
            }
            if entry.hash != hash {
                continue;
            }
            if (record.freq_hz - entry.freq_hz).abs() <= MIN_FREQ_DIFF_HZ {
                continue; // same channel, legitimate retransmission
            }
            self.suppressed_count += 1;
            log::debug!(
                "sdr_dedup: suppressing cross-channel duplicate on channel {} at {:.1} Hz (suppressed_count={})",
                record.channel,
                record.freq_hz,
                self.suppressed_count
            );
            self.insert(hash, record.freq_hz, now);
            return false;
        }

        self.insert(hash, record.freq_hz, now);
        true
    }

    fn insert(&mut self, hash: u32, freq_hz: f64, timestamp_ms: u64) {
        let entry = Entry { hash, freq_hz, timestamp_ms };
        if self.ring.len() < RING_CAPACITY {
            self.ring.push(entry);
            self.head = self.ring.len() - 1;
        } else {
            self.head = (self.head + 1) % RING_CAPACITY;
            self.ring[self.head] = entry;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(channel: usize, freq_hz: f64, timestamp_ms: u64, text: &str) -> DecodedRecord {
        DecodedRecord {
            channel,
            freq_hz,
            timestamp_ms,
            values: vec![DataValue::Text(text.to_string())],
        }
    }

    #[test]
    fn first_sighting_always_passes() {
        let mut dedup = Dedup::new();
        assert!(dedup.check(&record(0, 868_500_000.0, 0, "hello")));
        assert_eq!(dedup.suppressed_count(), 0);
    }

    #[test]
    fn repeat_on_nearby_frequency_is_forwarded_as_legitimate_retransmission() {
        let mut dedup = Dedup::new();
        assert!(dedup.check(&record(0, 868_500_000.0, 0, "hello")));
        assert!(dedup.check(&record(1, 868_500_300.0, 50, "hello")));
        assert_eq!(dedup.suppressed_count(), 0);
    }

    #[test]
    fn repeat_on_distant_frequency_is_suppressed_as_cross_channel_duplicate() {
        let mut dedup = Dedup::new();
        assert!(dedup.check(&record(0, 868_500_000.0, 0, "hello")));
        assert!(!dedup.check(&record(1, 915_000_000.0, 50, "hello")));
        assert_eq!(dedup.suppressed_count(), 1);
    }

    #[test]
    fn repeat_outside_window_is_not_suppressed() {
        let mut dedup = Dedup::new();
        assert!(dedup.check(&record(0, 868_500_000.0, 0, "hello")));
        assert!(dedup.check(&record(0, 868_500_000.0, 10_000, "hello")));
        assert_eq!(dedup.suppressed_count(), 0);
    }

    #[test]
    fn different_payload_is_never_suppressed() {
        let mut dedup = Dedup::new();
        assert!(dedup.check(&record(0, 868_500_000.0, 0, "hello")));
        assert!(dedup.check(&record(0, 868_500_000.0, 10, "world")));
        assert_eq!(dedup.suppressed_count(), 0);
    }

    #[test]
    fn ring_evicts_oldest_past_capacity() {
        let mut dedup = Dedup::new();
        for i in 0..64u64 {
            dedup.check(&record(0, 100_000_000.0 + i as f64, i, &format!("msg-{i}")));
        }
        // The very first fingerprint has long since been evicted; re-seeing
        // it after the ring wrapped twice should not be reported as a
        // duplicate of something still tracked.
        assert!(dedup.check(&record(0, 100_000_000.0, 1000, "msg-0")));
    }
}
