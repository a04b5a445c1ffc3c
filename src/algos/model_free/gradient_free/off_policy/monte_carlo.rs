use crate::algos::common::argmax;
use crate::algos::model_free::{rollout, EpisodeEvent};
use crate::{Result, RlError};
use minigym::*;
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Off-policy Monte Carlo control with weighted importance sampling - Sutton & Barto 2018,
/// section 5.7.
///
/// Episodes are generated by the `behaviour` policy. The target policy is greedy w.r.t. `Q`,
/// lowest action on ties.
#[derive(Debug, Clone)]
pub struct OffPolicyMcControl<P: Policy> {
    n_a: usize,
    gamma: Continous,
    behaviour: P,
    max_episode_steps: Option<usize>,
    q: Vec<Vec<Continous>>,
    c: Vec<Vec<Continous>>,
    pi: Vec<Discrete>,
    episodes: usize,
}

impl<P: Policy> OffPolicyMcControl<P> {
    pub const DEFAULT_GAMMA: Continous = 1.;

    pub fn new(n_s: usize, n_a: usize, behaviour: P, gamma: Continous) -> Self {
        Self {
            n_a,
            gamma,
            behaviour,
            max_episode_steps: None,
            q: vec![vec![0.; n_a]; n_s],
            c: vec![vec![0.; n_a]; n_s],
            pi: vec![0; n_s],
            episodes: 0,
        }
    }

    pub fn for_env<E: Space>(env: &E, behaviour: P, gamma: Continous) -> Self {
        Self::new(env.n_s(), env.n_a(), behaviour, gamma)
    }

    /// Cuts every generated episode after `n` steps, on top of the environment's own limit.
    pub fn with_max_episode_steps(mut self, n: usize) -> Self {
        self.max_episode_steps = Some(n);
        self
    }

    pub fn q(&self, s: Discrete) -> &[Continous] {
        &self.q[s]
    }

    /// Cumulative importance weights of `s`, one per action.
    pub fn c(&self, s: Discrete) -> &[Continous] {
        &self.c[s]
    }

    pub fn policy(&self) -> &[Discrete] {
        &self.pi
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Backward pass over one behaviour episode. Returns the number of steps that updated `Q`
    /// before the behaviour diverged from the target policy.
    pub fn update(&mut self, episode: &[EpisodeEvent]) -> Result<usize> {
        let mut g = 0.;
        let mut w = 1.;
        let mut updated = 0;

        for &EpisodeEvent { s, a, r } in episode.iter().rev() {
            if a >= self.n_a {
                return Err(EnvError::InvalidAction {
                    action: a,
                    n_a: self.n_a,
                }
                .into());
            }

            g = self.gamma * g + r;
            self.c[s][a] += w;
            if self.c[s][a] <= 0. {
                return Err(RlError::DivisionByZeroWeight { s, a });
            }
            self.q[s][a] += (w / self.c[s][a]) * (g - self.q[s][a]);
            updated += 1;

            self.pi[s] = argmax(&self.q[s]);
            if a != self.pi[s] {
                break;
            }

            let b = self.behaviour.probability(s, a);
            if !(b > 0. && b <= 1.) {
                return Err(RlError::InvalidDistribution(format!(
                    "behaviour policy gives b({a}|{s}) = {b} for an action it took"
                )));
            }
            w /= b;
        }

        Ok(updated)
    }

    pub fn run_episode<E: Simulator>(&mut self, env: &mut E, rng: &mut StdRng) -> Result<usize> {
        let episode = rollout(env, &self.behaviour, rng, self.max_episode_steps)?;
        let updated = self.update(&episode)?;
        self.episodes += 1;

        Ok(updated)
    }

    pub fn train<E: Simulator>(&mut self, env: &mut E, num_episodes: usize, rng: &mut StdRng) -> Result<()> {
        for i in 1..=num_episodes {
            let updated = self.run_episode(env, rng)?;
            if i % 1000 == 0 {
                debug!(episode = i, updated, "MC control progress.");
            }
        }

        info!(
            env = env.name(),
            episodes = self.episodes,
            "Off-policy MC control finished."
        );
        Ok(())
    }
}

impl<P: Policy> Policy for OffPolicyMcControl<P> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use minigym::common::utils::{DOWN, LEFT, RIGHT, UP};
    use rand::SeedableRng;

    fn ev(s: Discrete, a: Discrete, r: Continous) -> EpisodeEvent {
        EpisodeEvent { s, a, r }
    }

    #[test]
    fn weights_grow_along_the_greedy_tail() {
        let mc = &mut OffPolicyMcControl::new(3, 2, RandomPolicy::new(2), 1.);

        let updated = mc.update(&[ev(0, 1, 1.), ev(1, 0, 1.)]).unwrap();

        assert_eq!(updated, 2);
        assert_float_eq!(mc.c(1).to_vec(), vec![1., 0.], abs_all <= 1e-12);
        assert_float_eq!(mc.q(1).to_vec(), vec![1., 0.], abs_all <= 1e-12);
        // W doubled after the first greedy step.
        assert_float_eq!(mc.c(0).to_vec(), vec![0., 2.], abs_all <= 1e-12);
        assert_float_eq!(mc.q(0).to_vec(), vec![0., 2.], abs_all <= 1e-12);
        assert_eq!(mc.policy(), &[1, 0, 0]);
    }

    #[test]
    fn backward_pass_stops_where_the_behaviour_diverges() {
        let mc = &mut OffPolicyMcControl::new(3, 2, RandomPolicy::new(2), 1.);
        mc.update(&[ev(0, 1, 1.), ev(1, 0, 1.)]).unwrap();

        // In state 1 action 0 (1) still beats action 1 (-3), so state 0 is never reached.
        let updated = mc.update(&[ev(0, 0, -5.), ev(1, 1, -3.)]).unwrap();

        assert_eq!(updated, 1);
        assert_float_eq!(mc.q(1).to_vec(), vec![1., -3.], abs_all <= 1e-12);
        assert_float_eq!(mc.c(0).to_vec(), vec![0., 2.], abs_all <= 1e-12);
        assert_eq!(mc.policy()[1], 0);
    }

    #[test]
    fn discounting_applies_to_the_return() {
        let mc = &mut OffPolicyMcControl::new(2, 1, RandomPolicy::new(1), 0.5);

        mc.update(&[ev(0, 0, 1.), ev(1, 0, 4.)]).unwrap();

        assert_float_eq!(mc.q(1)[0], 4., abs <= 1e-12);
        assert_float_eq!(mc.q(0)[0], 3., abs <= 1e-12);
    }

    #[test]
    fn invalid_actions_are_rejected() {
        let mc = &mut OffPolicyMcControl::new(3, 2, RandomPolicy::new(2), 1.);

        let err = mc.update(&[ev(0, 2, -1.)]).unwrap_err();

        assert!(matches!(
            err,
            RlError::Env(EnvError::InvalidAction { action: 2, n_a: 2 })
        ));
    }

    #[test]
    fn behaviour_must_cover_the_actions_it_took() {
        // Claims 0 probability for everything it does.
        let mc = &mut OffPolicyMcControl::new(3, 2, RandomPolicy::new(0), 1.);

        let err = mc.update(&[ev(0, 0, 1.)]).unwrap_err();

        assert!(matches!(err, RlError::InvalidDistribution(_)));
    }

    #[test]
    fn untried_actions_keep_the_lowest_index_target() {
        let mc = &mut OffPolicyMcControl::new(1, 4, RandomPolicy::new(4), 1.);

        let updated = mc.update(&[ev(0, 2, 0.)]).unwrap();

        assert_eq!(updated, 1);
        assert_eq!(mc.policy()[0], 0);
        assert_float_eq!(mc.q(0).to_vec(), vec![0.; 4], abs_all <= 1e-12);
        assert_float_eq!(mc.c(0).to_vec(), vec![0., 0., 1., 0.], abs_all <= 1e-12);
    }

    #[test]
    fn ties_stop_the_pass_unless_the_lowest_action_was_taken() {
        let mc = &mut OffPolicyMcControl::new(2, 2, RandomPolicy::new(2), 1.);

        // Q(1) = [0, 0] after the update, so the target stays at action 0.
        assert_eq!(mc.update(&[ev(0, 0, 0.), ev(1, 1, 0.)]).unwrap(), 1);
        assert_eq!(mc.update(&[ev(0, 0, 0.), ev(1, 0, 0.)]).unwrap(), 2);
        assert_float_eq!(mc.c(0).to_vec(), vec![2., 0.], abs_all <= 1e-12);
    }

    #[test]
    fn cumulative_weights_never_decrease() {
        let env = &mut GridWorld::default();
        let rng = &mut StdRng::seed_from_u64(2718);
        let mc = &mut OffPolicyMcControl::for_env(&*env, RandomPolicy::for_env(&*env), 1.);

        let mut before = (0..env.n_s()).map(|s| mc.c(s).to_vec()).collect::<Vec<_>>();
        for _ in 0..500 {
            mc.run_episode(env, rng).unwrap();
            let after = (0..env.n_s()).map(|s| mc.c(s).to_vec()).collect::<Vec<_>>();
            for (b, a) in before.iter().flatten().zip(after.iter().flatten()) {
                assert!(a >= b);
            }
            before = after;
        }
        assert_eq!(mc.episodes(), 500);
    }

    #[test]
    fn episode_ceiling_bounds_the_rollouts() {
        let env = &mut CliffWalking::new();
        let rng = &mut StdRng::seed_from_u64(2718);
        let mc = &mut OffPolicyMcControl::for_env(&*env, RandomPolicy::for_env(&*env), 1.)
            .with_max_episode_steps(10);

        for _ in 0..50 {
            assert!(mc.run_episode(env, rng).unwrap() <= 10);
        }
    }

    #[test]
    fn target_stays_greedy_over_q_on_the_grid() {
        let env = &mut GridWorld::default();
        let rng = &mut StdRng::seed_from_u64(2718);
        let mc = &mut OffPolicyMcControl::for_env(&*env, RandomPolicy::for_env(&*env), 1.);

        mc.train(env, 20_000, rng).unwrap();

        for s in 0..env.n_s() {
            assert_eq!(mc.policy()[s], argmax(mc.q(s)));
            assert!(mc.q(s).iter().all(|&q| q <= 0.));
            if env.is_terminal(&env.state(s)) {
                assert_float_eq!(mc.c(s).to_vec(), vec![0.; 4], abs_all <= 1e-12);
            }
        }
        // Entering a corner is free and always the last step of its episode.
        for (s, a) in [(1, LEFT), (4, UP), (11, DOWN), (14, RIGHT)] {
            assert!(mc.c(s)[a] > 0.);
            assert_float_eq!(mc.q(s)[a], 0., abs <= 1e-12);
        }
    }
}
