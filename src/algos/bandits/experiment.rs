use super::{ActionSelection, SampleAverage};
use crate::Result;
use minigym::{Bandit, Continous};
use rand::prelude::*;
use serde::Serialize;
use tracing::info;

/// Per time step averages over independent runs of the k-armed testbed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentResult {
    pub avg_reward: Vec<Continous>,
    pub optimal_action_percent: Vec<Continous>,
}

impl ExperimentResult {
    /// Averages of the last `n` steps: (reward, % optimal action).
    pub fn tail_mean(&self, n: usize) -> (Continous, Continous) {
        let mean = |xs: &[Continous]| {
            let tail = &xs[xs.len().saturating_sub(n)..];
            if tail.is_empty() {
                0.
            } else {
                tail.iter().sum::<Continous>() / tail.len() as Continous
            }
        };

        (mean(&self.avg_reward), mean(&self.optimal_action_percent))
    }
}

/// Fresh testbed whose arms draw from their own stream, split off the experiment's.
fn testbed(k: usize, rng: &mut StdRng) -> Bandit {
    Bandit::new(k, rng.gen())
}

pub fn run_experiment<S: ActionSelection + ?Sized>(
    selector: &S,
    k: usize,
    runs: usize,
    steps: usize,
    seed: u64,
) -> Result<ExperimentResult> {
    let rng = &mut StdRng::seed_from_u64(seed);
    let mut bandit = testbed(k, rng);
    let mut avg_reward = vec![0.; steps];
    let mut optimal_action_percent = vec![0.; steps];

    for _ in 0..runs {
        bandit.reset();
        let mut estimates = SampleAverage::new(k);

        for t in 0..steps {
            let a = selector.select(t, &estimates, rng)?;
            let reward = bandit.reward(a)?;
            estimates.update(a, reward);

            avg_reward[t] += reward;
            if a == bandit.optimal_action() {
                optimal_action_percent[t] += 100.;
            }
        }
    }

    if runs > 0 {
        let runs = runs as Continous;
        avg_reward.iter_mut().for_each(|x| *x /= runs);
        optimal_action_percent.iter_mut().for_each(|x| *x /= runs);
    }

    let result = ExperimentResult {
        avg_reward,
        optimal_action_percent,
    };
    let (tail_reward, tail_optimal) = result.tail_mean(steps / 10);
    info!(k, runs, steps, tail_reward, tail_optimal, "Bandit experiment done.");

    Ok(result)
}
