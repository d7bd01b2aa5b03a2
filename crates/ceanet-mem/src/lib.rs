#![forbid(unsafe_code)]
//! ceanet-mem: hard memory budget for generalized tables.
//!
//! This crate provides the concrete implementation of the *interfaces* in
//! `ceanet-core::budget`. The elimination runtime reserves an estimate for
//! every table it is about to materialize and holds the RAII guard until the
//! table has been folded into the next one.

pub mod error;
pub mod guard;
pub mod tracking;

pub use error::{Error, Result};
pub use guard::{TableBudget, TableGuard};
pub use tracking::PeakTracker;
