#![forbid(unsafe_code)]
//! ceanet-exec: elimination runtime, deterministic replay, and metrics.
//!
//! The runtime executes a caller-supplied elimination program one step at a
//! time, reserving table memory before each step, and emits a RunManifest.
//! Choosing the elimination order is left to the caller.

pub mod metrics;
pub mod replay;
pub mod runtime;

pub use runtime::{Engine, EliminationProgram, Evaluation, ExecError, Step};
