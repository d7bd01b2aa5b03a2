//! Run manifest for audit/replay.
//!
//! The runtime emits one per evaluation. Sensitivity analyses that re-run
//! the same program compare `program_hash`/`frontier_hash` across runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: ManifestId,

    /// Hash of the initial table and every elimination step.
    pub program_hash: Hash256,

    /// Hash of the resulting frontier; set by `finish`.
    pub frontier_hash: Option<Hash256>,

    pub engine_version: String,

    /// Elimination steps executed.
    pub steps: usize,

    /// Highest number of bytes reserved for tables at any point.
    pub peak_table_bytes: usize,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(program_hash: Hash256, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            program_hash,
            frontier_hash: None,
            engine_version: crate::VERSION.to_string(),
            steps: 0,
            peak_table_bytes: 0,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(
        mut self,
        finished_ms: u64,
        steps: usize,
        peak_table_bytes: usize,
        frontier_hash: Hash256,
    ) -> Self {
        self.finished_ms = finished_ms;
        self.steps = steps;
        self.peak_table_bytes = peak_table_bytes;
        self.frontier_hash = Some(frontier_hash);
        self
    }
}
