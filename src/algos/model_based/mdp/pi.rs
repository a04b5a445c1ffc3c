use super::{common::*, Mdp, MdpSolver};
use crate::algos::common::argmax;
use crate::{Result, RlError};
use minigym::{Continous, Discrete, Policy};
use rand::rngs::StdRng;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Policy iteration - Sutton & Barto 2018, section 4.3.
///
/// Starts from the policy that picks action 0 everywhere.
#[derive(Debug, Clone)]
pub struct PolicyIteration {
    mdp: Rc<Mdp>,
    gamma: Continous,
    v: Vec<Continous>,
    pi: Vec<Discrete>,
}

impl PolicyIteration {
    pub const DEFAULT_GAMMA: Continous = 0.9;

    pub fn new(mdp: Rc<Mdp>, gamma: Continous) -> Self {
        let n_s = mdp.n_s();
        Self {
            mdp,
            gamma,
            v: vec![0.; n_s],
            pi: vec![0; n_s],
        }
    }

    /// Evaluates the current deterministic policy in place. Returns the number of sweeps.
    pub fn evaluate_policy(&mut self, theta: Continous, num_iterations: Option<usize>) -> Result<usize> {
        let (mdp, pi, gamma) = (&*self.mdp, &self.pi, self.gamma);
        sweep_until_converged(mdp, &mut self.v, theta, num_iterations, |s, v| {
            lookahead(mdp, v, gamma, s, pi[s])
        })
    }

    /// Makes the policy greedy w.r.t. the current values. Returns true when no action changed.
    pub fn improve_policy(&mut self) -> bool {
        let mut policy_stable = true;
        for s in self.mdp.non_terminal_states() {
            let best = argmax(&q_values(&self.mdp, &self.v, self.gamma, s));
            if best != self.pi[s] {
                policy_stable = false;
                self.pi[s] = best;
            }
        }

        policy_stable
    }

    pub fn policy(&self) -> &[Discrete] {
        &self.pi
    }

    pub fn value(&self) -> &[Continous] {
        &self.v
    }
}

impl MdpSolver<bool> for PolicyIteration {
    fn v_star(&self, s: Discrete) -> Continous {
        self.v[s]
    }

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continous> {
        (s < self.mdp.n_s() && a < self.mdp.n_a()).then(|| lookahead(&self.mdp, &self.v, self.gamma, s, a))
    }

    fn pi_star(&self, s: Discrete) -> Option<Discrete> {
        (!self.mdp.is_terminal(s)).then_some(self.pi[s])
    }

    /// Runs evaluate/improve rounds until the policy is stable. `num_iterations` caps both the
    /// sweeps of each evaluation and the number of rounds. Running out of rounds reports a NaN
    /// delta, since every evaluation itself converged.
    fn exec(&mut self, theta: Continous, num_iterations: Option<usize>) -> Result<(bool, usize)> {
        let mut rounds = 0;
        loop {
            let sweeps = self.evaluate_policy(theta, num_iterations)?;
            rounds += 1;

            let policy_stable = self.improve_policy();
            debug!(rounds, sweeps, policy_stable, "Policy iteration round.");

            if policy_stable {
                info!(env = self.mdp.name(), rounds, "Policy iteration converged.");
                return Ok((policy_stable, rounds));
            }

            if num_iterations.is_some_and(|n| rounds >= n) {
                warn!(rounds, "Improvement rounds exhausted before the policy was stable.");
                return Err(RlError::DidNotConverge {
                    iterations: rounds,
                    delta: Continous::NAN,
                });
            }
        }
    }
}

impl Policy for PolicyIteration {
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
