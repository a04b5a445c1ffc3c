pub mod bandit;
pub mod blackjack;
pub mod cliff_walking;
pub mod frozen_lake;
pub mod grid_world;
pub mod windy_grid_world;

pub use bandit::Bandit;
pub use blackjack::{Blackjack, Hand};
pub use cliff_walking::CliffWalking;
pub use frozen_lake::FrozenLake;
pub use grid_world::GridWorld;
pub use windy_grid_world::WindyGridWorld;
