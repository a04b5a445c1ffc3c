use float_eq::*;
use minigym::envs::blackjack::{HIT, STICK};
use minigym::*;
use rand::{rngs::StdRng, SeedableRng};
use rl::algos::model_based::mdp::{pe::PolicyEvaluator, pi::PolicyIteration, vi::ValueIteration, Mdp, MdpSolver};
use rl::algos::model_free::gradient_free::off_policy::monte_carlo::OffPolicyMcControl;
use rl::algos::model_free::{discounted_return, rollout};
use std::rc::Rc;

fn grid_mdp() -> Rc<Mdp> {
    Rc::new(Mdp::from_model(&GridWorld::default()).unwrap())
}

#[test]
fn policy_and_value_iteration_agree() {
    for gamma in [0.9, 0.5] {
        let mut pi = PolicyIteration::new(grid_mdp(), gamma);
        let mut vi = ValueIteration::new(grid_mdp(), gamma);

        pi.exec(1e-8, Some(1000)).unwrap();
        vi.exec(1e-8, Some(1000)).unwrap();

        assert_eq!(pi.policy(), vi.policy());
        assert_float_eq!(pi.value().to_vec(), vi.value().to_vec(), abs_all <= 1e-6);
    }
}

#[test]
fn every_solver_keeps_terminal_values_at_zero() {
    let mdp = grid_mdp();
    let mut pe = PolicyEvaluator::equiprobable(Rc::clone(&mdp), 1.);
    let mut pi = PolicyIteration::new(Rc::clone(&mdp), 0.9);
    let mut vi = ValueIteration::new(Rc::clone(&mdp), 1.);

    let v_pe = pe.evaluate(1e-4, None).unwrap().to_vec();
    pi.exec(1e-4, None).unwrap();
    vi.exec(1e-4, None).unwrap();

    for s in [0, 15] {
        assert_eq!(v_pe[s], 0.);
        assert_eq!(pi.v_star(s), 0.);
        assert_eq!(vi.v_star(s), 0.);
    }
}

#[test]
fn solved_policies_walk_straight_to_a_corner() {
    let env = &mut GridWorld::default();
    let rng = &mut StdRng::seed_from_u64(2718);
    let mut vi = ValueIteration::new(grid_mdp(), 1.);
    vi.exec(1e-6, None).unwrap();

    let episode = rollout(env, &vi, rng, None).unwrap();

    // (0, 2) -> (0, 1) -> (0, 0)
    assert_eq!(episode.len(), 2);
    assert_float_eq!(discounted_return(&episode, 1.), vi.v_star(2), abs <= 1e-12);
}

#[test]
fn mc_control_finds_optimal_actions_after_a_million_episodes() {
    let env = &mut GridWorld::default();
    let rng = &mut StdRng::seed_from_u64(2718);
    let mut mc = OffPolicyMcControl::for_env(&*env, RandomPolicy::for_env(&*env), 1.);
    let mut vi = ValueIteration::new(grid_mdp(), 1.);
    vi.exec(1e-6, None).unwrap();

    mc.train(env, 1_000_000, rng).unwrap();

    assert_eq!(mc.episodes(), 1_000_000);
    for s in (0..env.n_s()).filter(|&s| !env.is_terminal(&env.state(s))) {
        let a = mc.policy()[s];
        assert_float_eq!(vi.q_star(s, a).unwrap(), vi.v_star(s), abs <= 1e-9);
        assert_float_eq!(mc.q(s)[a], vi.v_star(s), abs <= 0.1);

        let optimal = (0..env.n_a())
            .filter(|&b| (vi.q_star(s, b).unwrap() - vi.v_star(s)).abs() <= 1e-9)
            .count();
        if optimal == 1 {
            assert_eq!(a, vi.policy()[s]);
        }
    }
}

#[test]
fn mc_control_sticks_on_twenty_one() {
    let env = &mut Blackjack::new(2718);
    let rng = &mut StdRng::seed_from_u64(2718);
    let mut mc = OffPolicyMcControl::for_env(&*env, RandomPolicy::for_env(&*env), 1.);

    mc.train(env, 20_000, rng).unwrap();

    let tried_both = (0..env.n_s())
        .filter(|&s| {
            let hand = env.state(s);
            hand.player_sum == 21 && !hand.usable_ace && mc.c(s).iter().all(|&c| c > 0.)
        })
        .collect::<Vec<_>>();
    assert!(!tried_both.is_empty());
    for s in tried_both {
        assert_float_eq!(mc.q(s)[HIT], -1., abs <= 1e-12);
        assert_eq!(mc.policy()[s], STICK);
    }
}
