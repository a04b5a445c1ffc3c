pub mod algos;
pub mod config;
pub mod report;
mod error;

pub use error::{Result, RlError};
