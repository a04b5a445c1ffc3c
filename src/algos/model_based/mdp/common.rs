use super::Mdp;
use crate::algos::common::argmax;
use crate::{Result, RlError};
use minigym::{Continous, Discrete};
use tracing::{trace, warn};

/// One step lookahead: R(s, a) + gamma * V[next(s, a)].
pub fn lookahead(mdp: &Mdp, v: &[Continous], gamma: Continous, s: Discrete, a: Discrete) -> Continous {
    let t = mdp.transition(s, a);
    t.reward + gamma * v[t.next_state]
}

pub fn q_values(mdp: &Mdp, v: &[Continous], gamma: Continous, s: Discrete) -> Vec<Continous> {
    (0..mdp.n_a())
        .map(|a| lookahead(mdp, v, gamma, s, a))
        .collect()
}

/// Greedy action per state, lowest action on ties. Terminal states keep action 0.
pub fn greedy_policy(mdp: &Mdp, v: &[Continous], gamma: Continous) -> Vec<Discrete> {
    (0..mdp.n_s())
        .map(|s| {
            if mdp.is_terminal(s) {
                0
            } else {
                argmax(&q_values(mdp, v, gamma, s))
            }
        })
        .collect()
}

/// Synchronous sweeps over the non-terminal states until the largest change is below
/// `theta`. Every sweep reads the previous sweep's values only. Returns the number of sweeps.
pub fn sweep_until_converged<F>(
    mdp: &Mdp,
    v: &mut Vec<Continous>,
    theta: Continous,
    num_iterations: Option<usize>,
    backup: F,
) -> Result<usize>
where
    F: Fn(Discrete, &[Continous]) -> Continous,
{
    let mut sweeps = 0;
    loop {
        let mut v_new = v.clone();
        let mut delta: Continous = 0.;
        for s in mdp.non_terminal_states() {
            v_new[s] = backup(s, v);
            delta = delta.max((v[s] - v_new[s]).abs());
        }

        *v = v_new;
        sweeps += 1;
        trace!(sweeps, delta, "Sweep done.");

        if delta < theta {
            return Ok(sweeps);
        }

        if num_iterations.is_some_and(|n| sweeps >= n) {
            warn!(sweeps, delta, theta, "Sweeps exhausted before convergence.");
            return Err(RlError::DidNotConverge {
                iterations: sweeps,
                delta,
            });
        }
    }
}
