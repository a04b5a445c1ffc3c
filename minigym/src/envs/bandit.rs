use crate::*;
use rand::prelude::*;
use rand_distr::StandardNormal;

/// k-armed testbed: arm values are drawn from N(0, 1), a pull pays N(q*(a), 1).
#[derive(Debug, Clone)]
pub struct Bandit {
    true_values: Vec<Continous>,
    optimal_action: Discrete,
    rng: StdRng,
}

impl Bandit {
    pub const DEFAULT_K: usize = 10;

    pub fn new(k: usize, seed: u64) -> Self {
        assert!(k > 0, "Bandit needs at least one arm.");

        let mut b = Self {
            true_values: vec![0.; k],
            optimal_action: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        b.reset();
        b
    }

    /// Draws fresh arm values.
    pub fn reset(&mut self) {
        for q in self.true_values.iter_mut() {
            *q = self.rng.sample(StandardNormal);
        }

        // First arm wins ties.
        self.optimal_action = self
            .true_values
            .iter()
            .enumerate()
            .fold(0, |best, (a, &q)| {
                if q > self.true_values[best] {
                    a
                } else {
                    best
                }
            });
    }

    pub fn k(&self) -> usize {
        self.true_values.len()
    }

    pub fn true_values(&self) -> &[Continous] {
        &self.true_values
    }

    pub fn optimal_action(&self) -> Discrete {
        self.optimal_action
    }

    pub fn reward(&mut self, a: Discrete) -> Result<Continous, EnvError> {
        let q = *self.true_values.get(a).ok_or(EnvError::InvalidAction {
            action: a,
            n_a: self.k(),
        })?;
        let noise: Continous = self.rng.sample(StandardNormal);
        Ok(q + noise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;

    #[test]
    fn optimal_action_has_the_highest_true_value() {
        let b = Bandit::new(10, 2718);

        let best = b.true_values()[b.optimal_action()];
        assert!(b.true_values().iter().all(|&q| q <= best));
    }

    #[test]
    fn rewards_are_centered_on_the_true_value() {
        let mut b = Bandit::new(5, 2718);

        let n = 20000;
        let mean = (0..n).map(|_| b.reward(2).unwrap()).sum::<f64>() / n as f64;

        assert_float_eq!(mean, b.true_values()[2], abs <= 5e-2);
    }

    #[test]
    fn pulling_a_missing_arm_is_an_error() {
        let mut b = Bandit::new(3, 2718);

        assert_eq!(
            b.reward(3),
            Err(EnvError::InvalidAction { action: 3, n_a: 3 })
        );
    }

    #[test]
    fn reset_draws_new_values() {
        let mut b = Bandit::new(10, 2718);
        let before = b.true_values().to_vec();

        b.reset();

        assert_ne!(before, b.true_values());
    }
}
