//! Deterministic replay & provenance helpers.
//!
//! The manifest hashes are computed from the serialized program and the
//! resulting frontier. Evaluating the same program under the same config
//! always yields the same frontier hash.

use ceanet_core::hash::{hash_serde, Hash256};
use ceanet_core::manifest::RunManifest;
use ceanet_partition::Partition;

use crate::runtime::{EliminationProgram, ExecError};

/// Hash the initial table and the step list into one stable digest.
pub fn hash_program(program: &EliminationProgram) -> Result<Hash256, ExecError> {
    let a = hash_serde(&program.initial).map_err(|e| ExecError::Hash(e.to_string()))?;
    let b = hash_serde(&program.steps).map_err(|e| ExecError::Hash(e.to_string()))?;
    Ok(a.chain(&b))
}

pub fn hash_frontier(frontier: &Partition) -> Result<Hash256, ExecError> {
    hash_serde(frontier).map_err(|e| ExecError::Hash(e.to_string()))
}

/// Whether two runs evaluated the same program to the same frontier.
pub fn same_outcome(a: &RunManifest, b: &RunManifest) -> bool {
    a.program_hash == b.program_hash && a.frontier_hash.is_some() && a.frontier_hash == b.frontier_hash
}
