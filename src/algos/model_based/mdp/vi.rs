use super::{common::*, Mdp, MdpSolver};
use crate::Result;
use minigym::{Continous, Discrete, Policy};
use rand::rngs::StdRng;
use std::rc::Rc;
use tracing::info;

/// Value iteration - Sutton & Barto 2018, section 4.4.
///
/// The greedy policy is extracted once, after the values have converged.
#[derive(Debug, Clone)]
pub struct ValueIteration {
    mdp: Rc<Mdp>,
    gamma: Continous,
    v: Vec<Continous>,
    pi: Vec<Discrete>,
}

impl ValueIteration {
    pub const DEFAULT_GAMMA: Continous = 1.;

    pub fn new(mdp: Rc<Mdp>, gamma: Continous) -> Self {
        let n_s = mdp.n_s();
        Self {
            mdp,
            gamma,
            v: vec![0.; n_s],
            pi: vec![0; n_s],
        }
    }

    pub fn policy(&self) -> &[Discrete] {
        &self.pi
    }

    pub fn value(&self) -> &[Continous] {
        &self.v
    }
}

impl MdpSolver<()> for ValueIteration {
    fn v_star(&self, s: Discrete) -> Continous {
        self.v[s]
    }

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continous> {
        (s < self.mdp.n_s() && a < self.mdp.n_a()).then(|| lookahead(&self.mdp, &self.v, self.gamma, s, a))
    }

    fn pi_star(&self, s: Discrete) -> Option<Discrete> {
        (!self.mdp.is_terminal(s)).then_some(self.pi[s])
    }

    fn exec(&mut self, theta: Continous, num_iterations: Option<usize>) -> Result<((), usize)> {
        let (mdp, gamma) = (&*self.mdp, self.gamma);
        let sweeps = sweep_until_converged(mdp, &mut self.v, theta, num_iterations, |s, v| {
            (0..mdp.n_a())
                .map(|a| lookahead(mdp, v, gamma, s, a))
                .fold(Continous::NEG_INFINITY, Continous::max)
        })?;

        self.pi = greedy_policy(mdp, &self.v, gamma);
        info!(env = mdp.name(), sweeps, "Value iteration converged.");

        Ok(((), sweeps))
    }
}

impl Policy for ValueIteration {
    fn policy(&self, s: Discrete, _rng: &mut StdRng) -> Discrete {
        self.pi[s]
    }

    fn probability(&self, s: Discrete, a: Discrete) -> Continous {
        if self.pi[s] == a {
            1.
        } else {
            0.
        }
    }
}
