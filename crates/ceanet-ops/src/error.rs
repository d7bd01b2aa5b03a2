use ceanet_partition::CeError;
use thiserror::Error;

/// Result type local to ceanet-ops.
pub type Result<T> = std::result::Result<T, OpError>;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("schema error: {0}")]
    Schema(String),

    #[error("cost-effectiveness error: {0}")]
    CostEffectiveness(#[from] CeError),

    #[error(transparent)]
    Core(#[from] ceanet_core::Error),
}
