extern crate rand;
extern crate serde;

pub mod common;
pub mod envs;
pub mod mdps;
mod error;

pub use common::defs::*;
pub use common::utils::{Cell, Grid};
pub use envs::*;
pub use error::EnvError;
pub use mdps::RandomPolicy;
