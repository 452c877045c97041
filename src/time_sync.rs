//! Clock-drift correction for signed request timestamps.
//!
//! Binance rejects signed requests whose `timestamp` deviates from server
//! time beyond `recvWindow`. Each client instance keeps its own measured
//! offset (different categories can observe different drift) and applies it
//! when timestamping. Refresh cadence is the caller's decision — there is no
//! background task.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// Per-client clock-drift state.
///
/// Concurrent updates are last-writer-wins: staleness of a few hundred
/// milliseconds is well inside the exchange's tolerance window, so no lock
/// is needed.
#[derive(Debug, Default)]
pub struct TimeSync {
    offset_ms: AtomicI64,
    synced: AtomicBool,
}

impl TimeSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one drift sample (`server_time − local_time`, both epoch ms).
    ///
    /// The first sample sets the offset directly; later samples blend with
    /// the previous value to smooth out network jitter.
    pub fn record_sample(&self, server_time: i64, local_time: i64) {
        let delta = server_time - local_time;
        let next = if self.synced.swap(true, Ordering::AcqRel) {
            let previous = self.offset_ms.load(Ordering::Acquire);
            (previous + delta) / 2
        } else {
            delta
        };
        self.offset_ms.store(next, Ordering::Release);
    }

    /// Current offset in milliseconds (0 until the first sample).
    pub fn offset_millis(&self) -> i64 {
        self.offset_ms.load(Ordering::Acquire)
    }

    /// True once at least one sample has been recorded.
    pub fn is_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }

    /// Local epoch milliseconds corrected by the measured drift.
    pub fn timestamp_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis() + self.offset_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_zero_before_sync() {
        let sync = TimeSync::new();
        assert!(!sync.is_synced());
        assert_eq!(sync.offset_millis(), 0);
    }

    #[test]
    fn test_first_sample_sets_offset_directly() {
        let sync = TimeSync::new();
        sync.record_sample(1_700_000_005_000, 1_700_000_000_000);
        assert!(sync.is_synced());
        assert_eq!(sync.offset_millis(), 5000);
    }

    #[test]
    fn test_later_samples_are_smoothed() {
        let sync = TimeSync::new();
        sync.record_sample(1_700_000_005_000, 1_700_000_000_000);
        sync.record_sample(1_700_000_011_000, 1_700_000_010_000);
        // (5000 + 1000) / 2
        assert_eq!(sync.offset_millis(), 3000);
    }

    #[test]
    fn test_negative_drift() {
        let sync = TimeSync::new();
        sync.record_sample(1_700_000_000_000, 1_700_000_002_500);
        assert_eq!(sync.offset_millis(), -2500);
    }

    #[test]
    fn test_timestamp_applies_offset() {
        let sync = TimeSync::new();
        let local = chrono::Utc::now().timestamp_millis();
        sync.record_sample(local + 5000, local);

        let stamped = sync.timestamp_millis();
        let expected = chrono::Utc::now().timestamp_millis() + 5000;
        // Small tolerance for execution time between the two `now()` reads.
        assert!((stamped - expected).abs() < 100, "stamped={stamped} expected≈{expected}");
    }
}
