use crate::EnvError;
use rand::rngs::StdRng;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

pub type Discrete = usize;
pub type Continous = f64;

/// Outcome of a single transition, simulated or real.
/// Refer: https://gymnasium.farama.org/api/env/#gymnasium.Env.step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepInfo<S> {
    pub observation: S,
    pub reward: Continous,
    pub terminated: bool,
    pub truncated: bool,
}

impl<S> StepInfo<S> {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Finite observation and action spaces. Every state has a dense index in `0..n_s()`.
pub trait Space {
    type State: Copy + Eq + Hash + Debug;

    fn name(&self) -> &str;

    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    /// State at a dense index. Callers keep `s < n_s()`.
    fn state(&self, s: Discrete) -> Self::State;

    fn index(&self, state: &Self::State) -> Discrete;

    fn check_action(&self, a: Discrete) -> Result<(), EnvError> {
        if a < self.n_a() {
            Ok(())
        } else {
            Err(EnvError::InvalidAction {
                action: a,
                n_a: self.n_a(),
            })
        }
    }
}

/// Deterministic model of the dynamics. `simulate` must not touch any internal state, so a
/// model can be shared between solvers.
pub trait Model: Space {
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Transition out of a terminal state is a zero-reward self loop.
    fn simulate(&self, state: &Self::State, a: Discrete) -> Result<StepInfo<Self::State>, EnvError>;
}

/// Stateful episode interface. One owner per rollout.
pub trait Simulator: Space {
    fn reset(&mut self) -> Self::State;

    fn step(&mut self, a: Discrete) -> Result<StepInfo<Self::State>, EnvError>;
}

pub trait Policy {
    fn policy(&self, s: Discrete, rng: &mut StdRng) -> Discrete;

    /// Probability of picking `a` in `s`.
    fn probability(&self, s: Discrete, a: Discrete) -> Continous;
}
