//! Runtime: execute an elimination program and emit a RunManifest.
//!
//! Behavior:
//! - Walks `program.steps` in order; the caller has already chosen the
//!   elimination order.
//! - Plans each step before running it and reserves the estimated footprint from a
//!   per-evaluation `TableBudget`; the previous table and its reservation are
//!   released as soon as the next table exists.
//! - Any operation failure is terminal for the evaluation and reported as
//!   an unevaluable network.
//! - Emits a `RunManifest` with stable program/frontier hashes.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;

use ceanet_core::prelude::{AnalysisConfig, RunManifest, ScalarTable, Variable};

use ceanet_mem::TableBudget;

use ceanet_ops::{ChanceElimination, DecisionElimination, Divide, EliminationOp, GTable, Multiply, OpError};
use ceanet_partition::Partition;

use crate::{metrics, replay};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("unevaluable network: step {step} ({op} on '{variable}') failed: {source}")]
    Unevaluable {
        step: usize,
        op: &'static str,
        variable: String,
        #[source]
        source: OpError,
    },
    #[error(transparent)]
    Budget(#[from] ceanet_mem::Error),
    #[error("invalid program: {0}")]
    Invalid(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("hashing error: {0}")]
    Hash(String),
}

/// One step of an elimination program.
#[derive(Debug, Clone, Serialize)]
pub enum Step {
    Chance(ChanceElimination),
    Decision(DecisionElimination),
    Multiply(Multiply),
    Divide(Divide),
}

impl Step {
    pub fn chance(variable: Variable, probability: ScalarTable) -> Self {
        Step::Chance(ChanceElimination { variable, probability })
    }

    pub fn decision(variable: Variable) -> Self {
        Step::Decision(DecisionElimination { variable })
    }

    pub fn multiply(table: ScalarTable) -> Self {
        Step::Multiply(Multiply { table })
    }

    pub fn divide(table: ScalarTable) -> Self {
        Step::Divide(Divide { table })
    }

    pub fn op(&self) -> &dyn EliminationOp {
        match self {
            Step::Chance(op) => op,
            Step::Decision(op) => op,
            Step::Multiply(op) => op,
            Step::Divide(op) => op,
        }
    }
}

/// Initial utility table plus the ordered steps that eliminate every
/// variable from it.
#[derive(Debug, Clone, Serialize)]
pub struct EliminationProgram {
    pub initial: GTable,
    pub steps: Vec<Step>,
}

impl EliminationProgram {
    pub fn new(initial: GTable) -> Self {
        Self {
            initial,
            steps: Vec::new(),
        }
    }

    /// Builder-style append.
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub frontier: Partition,
    pub manifest: RunManifest,
}

/// Engine owns the analysis config; every evaluation gets its own budget so
/// independent evaluations can run side by side.
#[derive(Debug, Clone)]
pub struct Engine {
    cfg: AnalysisConfig,
}

impl Engine {
    pub fn new(cfg: AnalysisConfig) -> Result<Self, ExecError> {
        cfg.validate().map_err(|e| ExecError::Config(e.to_string()))?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.cfg
    }

    /// Run `program` to completion and return the global frontier.
    pub fn evaluate(&self, program: &EliminationProgram) -> Result<Evaluation, ExecError> {
        let program_hash = replay::hash_program(program)?;
        let started = now_millis();
        let manifest = RunManifest::new(program_hash, started);
        let budget = TableBudget::new(self.cfg.mem_cap_bytes);

        let initial = &program.initial;
        let initial_bytes = initial_footprint(initial);
        let mut guard = budget.acquire(initial_bytes, "initial")?;

        let mut current: Option<GTable> = None;
        for (step, entry) in program.steps.iter().enumerate() {
            let op = entry.op();
            let input = current.as_ref().unwrap_or(initial);
            let unevaluable = |source: OpError| ExecError::Unevaluable {
                step,
                op: op.name(),
                variable: op.variable().map(|v| v.name().to_string()).unwrap_or_default(),
                source,
            };

            let plan = op.plan(input).map_err(unevaluable)?;
            let bytes = to_usize(plan.footprint.estimate_bytes());
            let next_guard = budget.acquire(bytes, op.name())?;
            let out = op.eval(input, &self.cfg).map_err(unevaluable)?;

            metrics::record_step(step, op.name(), op.variable().map(Variable::name), &out, bytes);
            current = Some(out);
            guard = next_guard;
        }

        let table = current.unwrap_or_else(|| initial.clone());
        if !table.variables().is_empty() {
            let names: Vec<&str> = table.variables().iter().map(Variable::name).collect();
            return Err(ExecError::Invalid(format!(
                "variables left after the last step: {}",
                names.join(", ")
            )));
        }
        let frontier = table
            .into_single()
            .map_err(|e| ExecError::Invalid(e.to_string()))?;
        drop(guard);

        let frontier_hash = replay::hash_frontier(&frontier)?;
        let finished = now_millis();
        let manifest = manifest.finish(finished, program.steps.len(), budget.peak_bytes(), frontier_hash);
        metrics::record_finish(
            manifest.steps,
            frontier.num_intervals(),
            manifest.peak_table_bytes,
            finished.saturating_sub(started),
        );
        Ok(Evaluation { frontier, manifest })
    }
}

// --- helpers ---

fn initial_footprint(table: &GTable) -> usize {
    let fp = ceanet_ops::Footprint::new(table.len() as u64, table.max_intervals() as u64);
    to_usize(fp.estimate_bytes())
}

fn to_usize(bytes: u64) -> usize {
    usize::try_from(bytes).unwrap_or(usize::MAX)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
