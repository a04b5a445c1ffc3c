pub mod gradient_free;

use crate::Result;
use minigym::*;
use rand::rngs::StdRng;
use serde::Serialize;

/// One step of an episode: the state the action was taken in, the action, and the reward
/// that followed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeEvent {
    pub s: Discrete,
    pub a: Discrete,
    pub r: Continous,
}

/// Plays one episode from `reset` until the environment reports done, or until `max_steps`
/// steps have been taken.
pub fn rollout<E, P>(
    env: &mut E,
    policy: &P,
    rng: &mut StdRng,
    max_steps: Option<usize>,
) -> Result<Vec<EpisodeEvent>>
where
    E: Simulator,
    P: Policy + ?Sized,
{
    let mut ep = vec![];
    let mut state = env.reset();
    loop {
        let s = env.index(&state);
        let a = policy.policy(s, rng);
        let si = env.step(a)?;
        ep.push(EpisodeEvent { s, a, r: si.reward });

        if si.done() || max_steps.is_some_and(|n| ep.len() >= n) {
            return Ok(ep);
        }
        state = si.observation;
    }
}

pub fn discounted_return(ep: &[EpisodeEvent], gamma: Continous) -> Continous {
    ep.iter().rev().fold(0., |g, e| gamma * g + e.r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use rand::SeedableRng;

    struct Always(Discrete);

    impl Policy for Always {
        fn policy(&self, _s: Discrete, _rng: &mut StdRng) -> Discrete {
            self.0
        }

        fn probability(&self, _s: Discrete, a: Discrete) -> Continous {
            if a == self.0 {
                1.
            } else {
                0.
            }
        }
    }

    #[test]
    fn rollout_records_state_action_reward() {
        let env = &mut GridWorld::default();
        let rng = &mut StdRng::seed_from_u64(2718);

        let ep = rollout(env, &Always(2), rng, None).unwrap();

        assert_eq!(
            ep,
            vec![
                EpisodeEvent { s: 2, a: 2, r: -1. },
                EpisodeEvent { s: 1, a: 2, r: 0. },
            ]
        );
    }

    #[test]
    fn rollout_stops_at_truncation() {
        let env = &mut GridWorld::new(5);
        let rng = &mut StdRng::seed_from_u64(2718);

        let ep = rollout(env, &Always(0), rng, None).unwrap();

        assert_eq!(ep.len(), 5);
    }

    #[test]
    fn rollout_honours_its_own_step_ceiling() {
        let env = &mut CliffWalking::new();
        let rng = &mut StdRng::seed_from_u64(2718);

        let ep = rollout(env, &Always(2), rng, Some(25)).unwrap();

        assert_eq!(ep.len(), 25);
    }

    #[test]
    fn invalid_actions_abort_the_rollout() {
        let env = &mut GridWorld::default();
        let rng = &mut StdRng::seed_from_u64(2718);

        let err = rollout(env, &Always(7), rng, None).unwrap_err();

        assert!(matches!(
            err,
            crate::RlError::Env(EnvError::InvalidAction { action: 7, n_a: 4 })
        ));
    }

    #[test]
    fn returns_are_discounted_from_the_back() {
        let ep = [
            EpisodeEvent { s: 0, a: 0, r: -1. },
            EpisodeEvent { s: 0, a: 0, r: -1. },
            EpisodeEvent { s: 0, a: 0, r: 10. },
        ];

        assert_float_eq!(discounted_return(&ep, 0.5), -1. - 0.5 + 2.5, abs <= 1e-12);
        assert_float_eq!(discounted_return(&ep, 1.), 8., abs <= 1e-12);
    }
}
