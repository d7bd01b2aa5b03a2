#![forbid(unsafe_code)]
//! ceanet-core: shared vocabulary for bi-criteria (cost, effectiveness) elimination.
//!
//! Responsibilities:
//! - Discrete variables and the row-major scalar tables that carry
//!   probabilities and plain utilities (plus the coordinate/offset walk that
//!   aligns tables with different variable sets).
//! - Strategy trees: the "what to do" attached to every frontier interval.
//! - Analysis configuration, errors, hashing, and run manifests.
//!
//! **No I/O, no async, no global state** here. The partition algebra lives in
//! `ceanet-partition`, the generalized tables in `ceanet-ops`.

pub mod budget;
pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod manifest;
pub mod prelude;
pub mod serde_ext;
pub mod strategy;
pub mod table;
pub mod variable;

pub use config::{AnalysisConfig, ThresholdDomain};
pub use error::{Error, Result};
pub use strategy::{Strategy, StrategyBranch, StrategyTree};
pub use table::{CoordinateWalker, ScalarTable};
pub use variable::{Variable, VariableKind};

/// Crate version recorded in run manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
