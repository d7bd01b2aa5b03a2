//! Peak reservation tracking.
//!
//! Keep this cheap; it runs on every successful reservation.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct PeakTracker {
    peak_bytes: AtomicUsize,
}

impl PeakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new "used bytes" value; updates peak if higher.
    pub fn record_used(&self, used_bytes: usize) {
        let previous = self.peak_bytes.fetch_max(used_bytes, Ordering::AcqRel);
        #[cfg(feature = "tracing")]
        if used_bytes > previous {
            tracing::trace!(used_bytes, previous_peak = previous, "table budget peak");
        }
        #[cfg(not(feature = "tracing"))]
        let _ = previous;
    }

    pub fn peak(&self) -> usize {
        self.peak_bytes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_maximum() {
        let t = PeakTracker::new();
        t.record_used(10);
        t.record_used(40);
        t.record_used(20);
        assert_eq!(t.peak(), 40);
    }
}
