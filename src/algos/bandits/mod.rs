pub mod experiment;

use crate::algos::common::argmax;
use crate::{Result, RlError};
use minigym::{Continous, Discrete};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Incremental sample-average estimates of the arm values - Sutton & Barto 2018, section 2.4.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleAverage {
    q: Vec<Continous>,
    n: Vec<usize>,
}

impl SampleAverage {
    pub fn new(k: usize) -> Self {
        Self {
            q: vec![0.; k],
            n: vec![0; k],
        }
    }

    pub fn k(&self) -> usize {
        self.q.len()
    }

    pub fn q(&self) -> &[Continous] {
        &self.q
    }

    pub fn counts(&self) -> &[usize] {
        &self.n
    }

    pub fn update(&mut self, a: Discrete, reward: Continous) {
        self.n[a] += 1;
        self.q[a] += (reward - self.q[a]) / self.n[a] as Continous;
    }
}

pub trait ActionSelection {
    /// Picks the arm to pull at time step `t`, counting from 0.
    fn select(&self, t: usize, estimates: &SampleAverage, rng: &mut StdRng) -> Result<Discrete>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    pub epsilon: Continous,
}

impl ActionSelection for EpsilonGreedy {
    fn select(&self, _t: usize, estimates: &SampleAverage, rng: &mut StdRng) -> Result<Discrete> {
        if rng.gen::<Continous>() < self.epsilon {
            return Ok(rng.gen_range(0..estimates.k()));
        }

        let q = estimates.q();
        let best = q[argmax(q)];
        let ties = (0..q.len()).filter(|&a| q[a] == best).collect::<Vec<_>>();
        ties.choose(rng)
            .copied()
            .ok_or_else(|| RlError::InvalidDistribution("bandit has no arms".into()))
    }
}

/// Upper confidence bound - Sutton & Barto 2018, section 2.7.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ucb {
    pub c: Continous,
}

impl ActionSelection for Ucb {
    fn select(&self, t: usize, estimates: &SampleAverage, _rng: &mut StdRng) -> Result<Discrete> {
        if let Some(a) = estimates.counts().iter().position(|&n| n == 0) {
            return Ok(a);
        }

        let ln_t = ((t + 1) as Continous).ln();
        let upper = estimates
            .q()
            .iter()
            .zip(estimates.counts())
            .map(|(q, &n)| q + self.c * (ln_t / n as Continous).sqrt())
            .collect::<Vec<_>>();

        Ok(argmax(&upper))
    }
}

/// Boltzmann exploration with temperature `tau`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Softmax {
    pub tau: Continous,
}

impl Softmax {
    pub fn probabilities(&self, q: &[Continous]) -> Vec<Continous> {
        let m = q.iter().copied().fold(Continous::NEG_INFINITY, Continous::max);
        let e = q.iter().map(|x| ((x - m) / self.tau).exp()).collect::<Vec<_>>();
        let z: Continous = e.iter().sum();

        e.into_iter().map(|x| x / z).collect()
    }
}

impl ActionSelection for Softmax {
    fn select(&self, _t: usize, estimates: &SampleAverage, rng: &mut StdRng) -> Result<Discrete> {
        let p = self.probabilities(estimates.q());
        let dist = WeightedIndex::new(&p).map_err(|e| RlError::InvalidDistribution(e.to_string()))?;

        Ok(dist.sample(rng))
    }
}
