use super::*;
use rand::prelude::*;

/// Uniform behaviour policy: every action has probability `1 / n_a`.
#[derive(Debug, Clone, Copy)]
pub struct RandomPolicy {
    pub n_a: usize,
}

impl RandomPolicy {
    pub fn new(n_a: usize) -> Self {
        Self { n_a }
    }

    pub fn for_env<E: Space>(env: &E) -> Self {
        Self::new(env.n_a())
    }
}

impl Policy for RandomPolicy {
    fn policy(&self, _s: Discrete, rng: &mut StdRng) -> Discrete {
        rng.gen_range(0..self.n_a)
    }

    fn probability(&self, _s: Discrete, a: Discrete) -> Continous {
        if a < self.n_a {
            1. / self.n_a as Continous
        } else {
            0.
        }
    }
}
