pub mod common;
pub mod pe;
pub mod pi;
pub mod vi;

use crate::Result;
use minigym::*;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next_state: Discrete,
    pub reward: Continous,
    pub done: bool,
}

/// Markov Decision Process - Sutton & Barto 2018.
///
/// Deterministic dynamics tabulated once from a [`Model`]: one [`Transition`] per
/// (state, action) pair, row major by state.
#[derive(Debug, Clone)]
pub struct Mdp {
    name: String,
    n_s: usize,
    n_a: usize,
    terminal: Vec<bool>,
    transitions: Vec<Transition>,
}

impl Mdp {
    pub fn from_model<M: Model>(model: &M) -> Result<Self> {
        let (n_s, n_a) = (model.n_s(), model.n_a());
        let mut terminal = Vec::with_capacity(n_s);
        let mut transitions = Vec::with_capacity(n_s * n_a);

        for s in 0..n_s {
            let state = model.state(s);
            terminal.push(model.is_terminal(&state));
            for a in 0..n_a {
                let si = model.simulate(&state, a)?;
                transitions.push(Transition {
                    next_state: model.index(&si.observation),
                    reward: si.reward,
                    done: si.terminated,
                });
            }
        }

        debug!(
            env = model.name(),
            n_s,
            n_a,
            terminals = terminal.iter().filter(|&&t| t).count(),
            "Tabulated model."
        );

        Ok(Self {
            name: model.name().to_string(),
            n_s,
            n_a,
            terminal,
            transitions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_s(&self) -> usize {
        self.n_s
    }

    pub fn n_a(&self) -> usize {
        self.n_a
    }

    pub fn is_terminal(&self, s: Discrete) -> bool {
        self.terminal[s]
    }

    pub fn transition(&self, s: Discrete, a: Discrete) -> &Transition {
        &self.transitions[s * self.n_a + a]
    }

    pub fn non_terminal_states(&self) -> impl Iterator<Item = Discrete> + '_ {
        (0..self.n_s).filter(|&s| !self.terminal[s])
    }
}

pub trait MdpSolver<T>: Policy {
    fn v_star(&self, s: Discrete) -> Continous;

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continous>;

    /// `None` for terminal states.
    fn pi_star(&self, s: Discrete) -> Option<Discrete>;

    fn exec(&mut self, theta: Continous, num_iterations: Option<usize>) -> Result<(T, usize)>;
}
