use minigym::{Continous, Discrete, EnvError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RlError {
    #[error("Did not converge after {iterations} iterations (last delta: {delta}).")]
    DidNotConverge { iterations: usize, delta: Continous },

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Cumulative weight of state {s}, action {a} is not positive.")]
    DivisionByZeroWeight { s: Discrete, a: Discrete },

    #[error("Invalid action distribution: {0}")]
    InvalidDistribution(String),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RlError>;
