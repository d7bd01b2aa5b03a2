//! Chance-variable elimination.

use ceanet_core::config::AnalysisConfig;
use ceanet_core::table::{cell_count, schema_union, CoordinateWalker, ScalarTable};
use ceanet_core::variable::{Variable, VariableKind};
use ceanet_partition::{weighted_average, Partition};

use crate::error::{OpError, Result};
use crate::gtable::{grouping_axes, GTable};

/// Remove chance variable `variable` by taking, for every configuration of
/// the remaining variables, the probability-weighted average of the cells
/// that differ only in `variable`.
///
/// The result schema is the union of both schemas (generalized table first)
/// without `variable`. Groups whose probabilities are all zero, or whose
/// partitions are all zero, become the zero partition.
pub fn multiply_and_marginalize(
    scalar: &ScalarTable,
    gtable: &GTable,
    variable: &Variable,
    cfg: &AnalysisConfig,
) -> Result<GTable> {
    if variable.kind() != VariableKind::Chance {
        return Err(OpError::Schema(format!(
            "'{variable}' is a decision; maximize it instead of marginalizing"
        )));
    }
    let union = schema_union(gtable.variables(), scalar.variables());
    if !union.contains(variable) {
        return Err(OpError::Schema(format!(
            "cannot marginalize '{variable}': not in either table"
        )));
    }
    let (remaining, axes) = grouping_axes(&union, variable);
    let mut walker = CoordinateWalker::new(&axes);
    let hg = walker.track(gtable.variables())?;
    let hs = walker.track(scalar.variables())?;

    let domain = cfg.domain();
    let card = variable.cardinality();
    let groups = cell_count(&remaining)?;
    let mut cells = Vec::with_capacity(groups);
    let mut branches = Vec::with_capacity(card);
    let mut probabilities = Vec::with_capacity(card);
    for _ in 0..groups {
        branches.clear();
        probabilities.clear();
        for _ in 0..card {
            branches.push(gtable.cells()[walker.position(hg)].clone());
            probabilities.push(scalar.values()[walker.position(hs)]);
            walker.advance();
        }

        let folded = if probabilities.iter().all(|&p| p == 0.0) || branches.iter().all(Partition::is_zero) {
            Partition::zero_within(domain)?
        } else {
            weighted_average(variable, &branches, &probabilities, cfg)?
        };
        cells.push(folded);
    }

    tracing::trace!(
        variable = %variable,
        cells = cells.len(),
        "marginalized chance variable"
    );
    GTable::new(remaining, cells)
}
