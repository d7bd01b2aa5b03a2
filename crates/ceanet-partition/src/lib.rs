#![forbid(unsafe_code)]
//! ceanet-partition: cost-effectiveness partitions and their algebra.
//!
//! A [`Partition`] splits the λ axis (willingness to pay per unit of
//! effectiveness) into intervals, each carrying the optimal strategy and its
//! cost and effectiveness. Three folds build and combine them:
//!
//! - [`deterministic_cea`]: raw alternatives → non-dominated frontier.
//! - [`optimal_cep`]: one candidate partition per decision option → frontier.
//! - [`weighted_average`]: one partition per chance outcome → expectation.
//!
//! Everything here is pure: inputs are borrowed, results are new values.

pub mod cea;
pub mod cut;
pub mod error;
pub mod icer;
pub mod optimal;
pub mod partition;
pub mod weighted;

pub use cea::deterministic_cea;
pub use cut::{
    cut_partition, drop_degenerate_intervals, get_union_thresholds, join_contiguous_intervals,
    join_partitions,
};
pub use error::{CeError, Result};
pub use icer::icer;
pub use optimal::{fold_decision_intervals, optimal_cep};
pub use partition::{Interval, Partition};
pub use weighted::weighted_average;
