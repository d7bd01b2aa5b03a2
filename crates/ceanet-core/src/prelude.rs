//! Convenient re-exports for downstream crates.

pub use crate::budget::{BudgetGuard, MemoryBudget};
pub use crate::config::{AnalysisConfig, ThresholdDomain};
pub use crate::error::{Error, Result};
pub use crate::id::VariableId;
pub use crate::manifest::{ManifestId, RunManifest};
pub use crate::strategy::{same_strategy, Strategy, StrategyBranch, StrategyTree};
pub use crate::table::{schema_union, CoordinateWalker, ScalarTable};
pub use crate::variable::{Variable, VariableKind};
