use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("Action {action} is not in the action space of size {n_a}.")]
    InvalidAction { action: usize, n_a: usize },

    #[error("Environment must be reset before stepping.")]
    NotReset,
}
