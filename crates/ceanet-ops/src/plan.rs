//! Planning surfaces: `Footprint` and `OpPlan`.
//!
//! The runtime reserves `Footprint::estimate_bytes` from the table budget
//! before an operation materializes its result.

use ceanet_core::strategy::Strategy;
use ceanet_core::variable::Variable;
use ceanet_partition::Partition;
use serde::Serialize;

/// Bytes held per interval of a partition: strategy pointer, cost,
/// effectiveness, and (amortized) one threshold.
pub const INTERVAL_BYTES: u64 = (std::mem::size_of::<Strategy>() + 3 * std::mem::size_of::<f64>()) as u64;

/// Fixed bytes per cell, excluding its intervals.
pub const CELL_BYTES: u64 = std::mem::size_of::<Partition>() as u64;

/// Coarse memory model of a generalized table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Footprint {
    pub cells: u64,
    /// Upper estimate of intervals per cell.
    pub intervals_per_cell: u64,
    pub overhead_bytes: u64,
}

impl Footprint {
    pub fn new(cells: u64, intervals_per_cell: u64) -> Self {
        Self {
            cells,
            intervals_per_cell,
            overhead_bytes: 0,
        }
    }

    pub fn estimate_bytes(&self) -> u64 {
        let per_cell = CELL_BYTES.saturating_add(self.intervals_per_cell.saturating_mul(INTERVAL_BYTES));
        self.overhead_bytes
            .saturating_add(self.cells.saturating_mul(per_cell))
    }
}

/// Output schema of an operation plus its cached footprint.
#[derive(Debug, Clone, Serialize)]
pub struct OpPlan {
    pub output_schema: Vec<Variable>,
    pub footprint: Footprint,
}

impl OpPlan {
    pub fn new(output_schema: Vec<Variable>, footprint: Footprint) -> Self {
        Self {
            output_schema,
            footprint,
        }
    }
}
