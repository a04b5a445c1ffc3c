use super::{common::*, Mdp};
use crate::Result;
use minigym::{Continous, Discrete};
use std::rc::Rc;
use tracing::info;

/// Policy whose state values are being estimated.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluatedPolicy {
    /// Every action with probability 1 / n_a.
    Equiprobable,
    /// One action per state.
    Deterministic(Vec<Discrete>),
    /// One row of action probabilities per state.
    Stochastic(Vec<Vec<Continous>>),
}

impl EvaluatedPolicy {
    pub fn probability(&self, n_a: usize, s: Discrete, a: Discrete) -> Continous {
        match self {
            Self::Equiprobable => 1. / n_a as Continous,
            Self::Deterministic(pi) => {
                if pi[s] == a {
                    1.
                } else {
                    0.
                }
            }
            Self::Stochastic(pi) => pi[s][a],
        }
    }
}

/// Iterative policy evaluation - Sutton & Barto 2018, section 4.1.
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    mdp: Rc<Mdp>,
    policy: EvaluatedPolicy,
    gamma: Continous,
    v: Vec<Continous>,
}

impl PolicyEvaluator {
    pub const DEFAULT_GAMMA: Continous = 1.;

    pub fn new(mdp: Rc<Mdp>, policy: EvaluatedPolicy, gamma: Continous) -> Self {
        let v = vec![0.; mdp.n_s()];
        Self {
            mdp,
            policy,
            gamma,
            v,
        }
    }

    pub fn equiprobable(mdp: Rc<Mdp>, gamma: Continous) -> Self {
        Self::new(mdp, EvaluatedPolicy::Equiprobable, gamma)
    }

    /// V_pi over every state; terminal entries stay 0.
    pub fn evaluate(&mut self, theta: Continous, num_iterations: Option<usize>) -> Result<&[Continous]> {
        let (mdp, policy, gamma) = (&*self.mdp, &self.policy, self.gamma);
        let n_a = mdp.n_a();

        let sweeps = sweep_until_converged(mdp, &mut self.v, theta, num_iterations, |s, v| {
            (0..n_a)
                .map(|a| (policy.probability(n_a, s, a), a))
                .filter(|&(p, _)| p > 0.)
                .map(|(p, a)| p * lookahead(mdp, v, gamma, s, a))
                .sum()
        })?;

        info!(env = mdp.name(), sweeps, "Policy evaluation converged.");
        Ok(&self.v)
    }

    pub fn value(&self) -> &[Continous] {
        &self.v
    }
}
