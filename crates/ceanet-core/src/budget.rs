//! Abstract memory budget interfaces.
//!
//! A generalized table holds one variable-length partition per joint
//! configuration, so the table produced by eliminating a well-connected
//! variable can dwarf everything else. The runtime reserves an estimate
//! before materializing each table. The concrete implementation lives in
//! `ceanet-mem`; only the traits live here.

/// A reservation returned by a memory budget.
///
/// Must be RAII (releases on Drop) and `Send`.
pub trait BudgetGuard: Send {
    /// Number of bytes currently accounted for by this guard.
    fn bytes(&self) -> usize;
    /// Optional debug tag for tracing.
    fn tag(&self) -> &'static str {
        "table"
    }
}

/// A handle representing a memory-cap enforcer.
///
/// The runtime calls `try_acquire` before materializing a table. `None`
/// means the table does not fit and the elimination step must fail.
pub trait MemoryBudget: Send + Sync + 'static {
    type Guard: BudgetGuard;

    /// Attempt to reserve `bytes`. Returns a guard on success.
    fn try_acquire(&self, bytes: usize, tag: &'static str) -> Option<Self::Guard>;

    /// Total configured capacity (bytes).
    fn capacity_bytes(&self) -> usize;

    /// Approximate currently reserved bytes.
    fn used_bytes(&self) -> usize;
}
