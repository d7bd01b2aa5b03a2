#![forbid(unsafe_code)]
//! ceanet-ops: generalized tables and the elimination operations over them.
//!
//! Design intent:
//! - Keep this crate pure and synchronous; every operation returns a new table.
//! - All operations walk the result table with `CoordinateWalker`, so cells of
//!   tables with different variable orders line up without reshaping.
//! - Each operation also exposes a planning surface (`OpPlan`) with an
//!   estimated footprint so the runtime can enforce its memory cap before
//!   materializing anything.

pub mod error;
pub mod gtable;
pub mod marginalize;
pub mod maximize;
pub mod multiply;
pub mod plan;
pub mod traits;

pub use error::{OpError, Result};
pub use gtable::GTable;
pub use marginalize::multiply_and_marginalize;
pub use maximize::ce_maximize;
pub use multiply::{divide, multiply};
pub use plan::{Footprint, OpPlan};
pub use traits::{ChanceElimination, DecisionElimination, Divide, EliminationOp, Multiply};
