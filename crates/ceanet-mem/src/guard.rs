//! Table budget + RAII guard.
//!
//! Every generalized table the runtime materializes is paid for up front.
//! Dropping the guard returns the bytes (panic-safe), so a table's
//! reservation ends exactly when the table itself is discarded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ceanet_core::budget::{BudgetGuard, MemoryBudget};

use crate::error::{Error, Result};
use crate::tracking::PeakTracker;

struct BudgetState {
    capacity: usize,
    used: AtomicUsize,
    peak: PeakTracker,
}

impl BudgetState {
    fn reserve(&self, bytes: usize) -> bool {
        let mut cur = self.used.load(Ordering::Relaxed);
        loop {
            let next = cur.saturating_add(bytes);
            if next > self.capacity {
                return false;
            }
            match self
                .used
                .compare_exchange(cur, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => {
                    self.peak.record_used(next);
                    return true;
                }
                Err(observed) => cur = observed,
            }
        }
    }

    fn release(&self, bytes: usize) {
        self.used.fetch_sub(bytes, Ordering::AcqRel);
    }
}

/// Byte budget shared by all tables of one evaluation.
#[derive(Clone)]
pub struct TableBudget {
    state: Arc<BudgetState>,
}

impl TableBudget {
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            state: Arc::new(BudgetState {
                capacity: capacity_bytes,
                used: AtomicUsize::new(0),
                peak: PeakTracker::new(),
            }),
        }
    }

    /// Like `try_acquire`, but reports why the reservation failed.
    pub fn acquire(&self, bytes: usize, tag: &'static str) -> Result<TableGuard> {
        self.try_acquire(bytes, tag).ok_or_else(|| Error::BudgetExceeded {
            tag,
            requested: bytes,
            capacity: self.state.capacity,
            used: self.state.used.load(Ordering::Relaxed),
        })
    }

    /// Highest reservation level seen so far.
    pub fn peak_bytes(&self) -> usize {
        self.state.peak.peak()
    }
}

/// Reservation for one materialized table.
pub struct TableGuard {
    state: Arc<BudgetState>,
    bytes: usize,
    tag: &'static str,
}

impl std::fmt::Debug for TableGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableGuard")
            .field("bytes", &self.bytes)
            .field("tag", &self.tag)
            .finish()
    }
}

impl Drop for TableGuard {
    fn drop(&mut self) {
        if self.bytes > 0 {
            self.state.release(self.bytes);
            self.bytes = 0;
        }
    }
}

impl BudgetGuard for TableGuard {
    fn bytes(&self) -> usize {
        self.bytes
    }
    fn tag(&self) -> &'static str {
        self.tag
    }
}

impl MemoryBudget for TableBudget {
    type Guard = TableGuard;

    fn try_acquire(&self, bytes: usize, tag: &'static str) -> Option<Self::Guard> {
        if bytes > 0 && !self.state.reserve(bytes) {
            return None;
        }
        Some(TableGuard {
            state: Arc::clone(&self.state),
            bytes,
            tag,
        })
    }

    fn capacity_bytes(&self) -> usize {
        self.state.capacity
    }

    fn used_bytes(&self) -> usize {
        self.state.used.load(Ordering::Relaxed)
    }
}
