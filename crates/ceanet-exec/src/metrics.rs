//! Metrics/tracing hooks.
//!
//! Events only; installing a subscriber is up to the binary layer.

use ceanet_ops::GTable;

pub fn record_step(step: usize, op: &'static str, variable: Option<&str>, table: &GTable, reserved_bytes: usize) {
    tracing::debug!(
        step,
        op,
        variable = variable.unwrap_or("-"),
        cells = table.len(),
        max_intervals = table.max_intervals(),
        reserved_bytes,
        "elimination step"
    );
}

pub fn record_finish(steps: usize, intervals: usize, peak_table_bytes: usize, elapsed_ms: u64) {
    tracing::info!(steps, intervals, peak_table_bytes, elapsed_ms, "evaluation finished");
}
