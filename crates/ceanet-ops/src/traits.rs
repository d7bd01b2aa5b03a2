//! Elimination operation trait + the four operations behind it.
//!
//! The exec runtime calls `plan(...)` to learn the output schema and
//! footprint, reserves memory for it, then invokes `eval(...)`.

use ceanet_core::config::AnalysisConfig;
use ceanet_core::table::{cell_count, schema_union, ScalarTable};
use ceanet_core::variable::Variable;
use serde::Serialize;

use crate::error::{OpError, Result};
use crate::gtable::{grouping_axes, GTable};
use crate::marginalize::multiply_and_marginalize;
use crate::maximize::ce_maximize;
use crate::multiply::{divide, multiply};
use crate::plan::{Footprint, OpPlan};

/// Trait that all elimination operations implement.
///
/// Invariants:
/// - `plan` must report the exact schema `eval` produces.
/// - `eval` must be deterministic given the same inputs and config.
pub trait EliminationOp: Send + Sync {
    /// Human-readable operation name (stable).
    fn name(&self) -> &'static str;

    /// Variable touched by this operation, if any.
    fn variable(&self) -> Option<&Variable> {
        None
    }

    /// Rough size of a result with `cells` cells, given inputs carrying at
    /// most `input_intervals` intervals per cell.
    fn memory_need(&self, cells: u64, input_intervals: u64) -> Footprint;

    fn plan(&self, input: &GTable) -> Result<OpPlan>;

    fn eval(&self, input: &GTable, cfg: &AnalysisConfig) -> Result<GTable>;
}

/// Chance elimination: weight by `probability`, then sum out `variable`.
#[derive(Debug, Clone, Serialize)]
pub struct ChanceElimination {
    pub variable: Variable,
    pub probability: ScalarTable,
}

/// Decision elimination: keep the frontier over the options of `variable`.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionElimination {
    pub variable: Variable,
}

#[derive(Debug, Clone, Serialize)]
pub struct Multiply {
    pub table: ScalarTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct Divide {
    pub table: ScalarTable,
}

fn planned(op: &dyn EliminationOp, input: &GTable, schema: Vec<Variable>) -> Result<OpPlan> {
    let cells = cell_count(&schema)? as u64;
    let footprint = op.memory_need(cells, input.max_intervals() as u64);
    Ok(OpPlan::new(schema, footprint))
}

impl EliminationOp for ChanceElimination {
    fn name(&self) -> &'static str {
        "marginalize"
    }

    fn variable(&self) -> Option<&Variable> {
        Some(&self.variable)
    }

    fn memory_need(&self, cells: u64, input_intervals: u64) -> Footprint {
        // Threshold union over the branches of one group.
        let card = self.variable.cardinality() as u64;
        Footprint::new(cells, card.saturating_mul(input_intervals.max(1)))
    }

    fn plan(&self, input: &GTable) -> Result<OpPlan> {
        let union = schema_union(input.variables(), self.probability.variables());
        if !union.contains(&self.variable) {
            return Err(OpError::Schema(format!(
                "cannot marginalize '{}': not in either table",
                self.variable
            )));
        }
        let (remaining, _) = grouping_axes(&union, &self.variable);
        planned(self, input, remaining)
    }

    fn eval(&self, input: &GTable, cfg: &AnalysisConfig) -> Result<GTable> {
        multiply_and_marginalize(&self.probability, input, &self.variable, cfg)
    }
}

impl EliminationOp for DecisionElimination {
    fn name(&self) -> &'static str {
        "maximize"
    }

    fn variable(&self) -> Option<&Variable> {
        Some(&self.variable)
    }

    fn memory_need(&self, cells: u64, input_intervals: u64) -> Footprint {
        // Threshold union plus at most one switch point per option and piece.
        let card = self.variable.cardinality() as u64;
        Footprint::new(cells, card.saturating_mul(input_intervals.max(1)).saturating_mul(2))
    }

    fn plan(&self, input: &GTable) -> Result<OpPlan> {
        if !input.contains(&self.variable) {
            return Err(OpError::Schema(format!(
                "cannot maximize '{}': not in the table",
                self.variable
            )));
        }
        let (remaining, _) = grouping_axes(input.variables(), &self.variable);
        planned(self, input, remaining)
    }

    fn eval(&self, input: &GTable, cfg: &AnalysisConfig) -> Result<GTable> {
        ce_maximize(input, &self.variable, cfg)
    }
}

impl EliminationOp for Multiply {
    fn name(&self) -> &'static str {
        "multiply"
    }

    fn memory_need(&self, cells: u64, input_intervals: u64) -> Footprint {
        Footprint::new(cells, input_intervals.max(1))
    }

    fn plan(&self, input: &GTable) -> Result<OpPlan> {
        planned(self, input, schema_union(input.variables(), self.table.variables()))
    }

    fn eval(&self, input: &GTable, _cfg: &AnalysisConfig) -> Result<GTable> {
        multiply(&self.table, input)
    }
}

impl EliminationOp for Divide {
    fn name(&self) -> &'static str {
        "divide"
    }

    fn memory_need(&self, cells: u64, input_intervals: u64) -> Footprint {
        Footprint::new(cells, input_intervals.max(1))
    }

    fn plan(&self, input: &GTable) -> Result<OpPlan> {
        planned(self, input, schema_union(input.variables(), self.table.variables()))
    }

    fn eval(&self, input: &GTable, _cfg: &AnalysisConfig) -> Result<GTable> {
        divide(input, &self.table)
    }
}
