pub mod bandits;
pub mod common;
pub mod model_based;
pub mod model_free;
