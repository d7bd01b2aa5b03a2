//! Decision-variable elimination.

use ceanet_core::config::AnalysisConfig;
use ceanet_core::table::{cell_count, CoordinateWalker};
use ceanet_core::variable::{Variable, VariableKind};
use ceanet_partition::optimal_cep;

use crate::error::{OpError, Result};
use crate::gtable::{grouping_axes, GTable};

/// Remove decision `decision` by folding, for every configuration of the
/// remaining variables, the candidate partitions (one per option) into their
/// cost-effectiveness frontier.
pub fn ce_maximize(gtable: &GTable, decision: &Variable, cfg: &AnalysisConfig) -> Result<GTable> {
    if decision.kind() != VariableKind::Decision {
        return Err(OpError::Schema(format!(
            "'{decision}' is a chance variable; marginalize it instead of maximizing"
        )));
    }
    if !gtable.contains(decision) {
        return Err(OpError::Schema(format!(
            "cannot maximize '{decision}': not in the table"
        )));
    }
    let (remaining, axes) = grouping_axes(gtable.variables(), decision);
    let mut walker = CoordinateWalker::new(&axes);
    let hg = walker.track(gtable.variables())?;

    let card = decision.cardinality();
    let groups = cell_count(&remaining)?;
    let mut cells = Vec::with_capacity(groups);
    let mut candidates = Vec::with_capacity(card);
    for _ in 0..groups {
        candidates.clear();
        for _ in 0..card {
            candidates.push(gtable.cells()[walker.position(hg)].clone());
            walker.advance();
        }
        cells.push(optimal_cep(decision, &candidates, cfg)?);
    }

    tracing::trace!(
        decision = %decision,
        cells = cells.len(),
        "maximized decision"
    );
    GTable::new(remaining, cells)
}
