use clap::{Args, Parser, Subcommand, ValueEnum};
use minigym::*;
use rand::{rngs::StdRng, SeedableRng};
use rl::algos::bandits::{experiment::run_experiment, ActionSelection, EpsilonGreedy, Softmax, Ucb};
use rl::algos::model_based::mdp::{pe::PolicyEvaluator, pi::PolicyIteration, vi::ValueIteration, Mdp, MdpSolver};
use rl::algos::model_free::gradient_free::off_policy::monte_carlo::OffPolicyMcControl;
use rl::algos::model_free::{discounted_return, rollout};
use rl::config::{Config, SweepConfig};
use rl::report::{policy_arrows, value_table};
use serde::Serialize;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

const GREEDY_ROLLOUT_STEPS: usize = 1000;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EnvArg {
    GridWorld,
    CliffWalking,
    WindyGridWorld,
    FrozenLake,
    SlipperyFrozenLake,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SelectorArg {
    EpsilonGreedy,
    Ucb,
    Softmax,
}

#[derive(Debug, Parser)]
#[command(name = "rl", about = "Tabular reinforcement learning on small grid worlds", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON config file; missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluates the equiprobable policy.
    Evaluate(SweepArgs),
    PolicyIteration(SweepArgs),
    ValueIteration(SweepArgs),
    /// Off-policy Monte Carlo control behind a uniform behaviour policy.
    McControl(McArgs),
    /// k-armed testbed experiment.
    Bandit(BanditArgs),
}

#[derive(Debug, Args)]
struct SweepArgs {
    #[arg(long, value_enum, default_value_t = EnvArg::GridWorld)]
    env: EnvArg,

    #[arg(long)]
    gamma: Option<Continous>,

    #[arg(long)]
    theta: Option<Continous>,
}

impl SweepArgs {
    fn apply(&self, mut sc: SweepConfig) -> SweepConfig {
        sc.gamma = self.gamma.unwrap_or(sc.gamma);
        sc.theta = self.theta.unwrap_or(sc.theta);
        sc
    }
}

#[derive(Debug, Args)]
struct McArgs {
    #[arg(long, value_enum, default_value_t = EnvArg::GridWorld)]
    env: EnvArg,

    #[arg(long)]
    gamma: Option<Continous>,

    #[arg(long)]
    episodes: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct BanditArgs {
    #[arg(long, value_enum, default_value_t = SelectorArg::EpsilonGreedy)]
    selector: SelectorArg,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct Solution {
    env: String,
    algorithm: &'static str,
    iterations: Option<usize>,
    value: Vec<Continous>,
    policy: Option<Vec<Discrete>>,
    greedy_return: Option<Continous>,
}

macro_rules! with_env {
    ($arg:expr, $env:ident => $body:expr) => {
        match $arg {
            EnvArg::GridWorld => {
                let $env = &mut GridWorld::default();
                $body
            }
            EnvArg::CliffWalking => {
                let $env = &mut CliffWalking::new();
                $body
            }
            EnvArg::WindyGridWorld => {
                let $env = &mut WindyGridWorld::new();
                $body
            }
            EnvArg::FrozenLake => {
                let $env = &mut FrozenLake::default();
                $body
            }
            EnvArg::SlipperyFrozenLake => {
                let $env = &mut FrozenLake::new(4, true);
                $body
            }
        }
    };
}

fn greedy_return<E: Simulator, P: Policy>(env: &mut E, policy: &P, gamma: Continous) -> rl::Result<Continous> {
    let rng = &mut StdRng::seed_from_u64(0);
    let episode = rollout(env, policy, rng, Some(GREEDY_ROLLOUT_STEPS))?;
    Ok(discounted_return(&episode, gamma))
}

fn evaluate<E: Model + Grid>(env: &E, sc: SweepConfig) -> rl::Result<Solution> {
    let mdp = Rc::new(Mdp::from_model(env)?);
    let mut pe = PolicyEvaluator::equiprobable(mdp, sc.gamma);
    let value = pe.evaluate(sc.theta, sc.max_iterations)?.to_vec();

    Ok(Solution {
        env: env.name().to_string(),
        algorithm: "policy-evaluation",
        iterations: None,
        value,
        policy: None,
        greedy_return: None,
    })
}

fn solve<E, S, T>(env: &mut E, solver: &mut S, algorithm: &'static str, sc: SweepConfig) -> rl::Result<Solution>
where
    E: Model + Simulator,
    S: MdpSolver<T>,
{
    let (_, iterations) = solver.exec(sc.theta, sc.max_iterations)?;
    let greedy_return = greedy_return(env, &*solver, sc.gamma)?;

    Ok(Solution {
        env: env.name().to_string(),
        algorithm,
        iterations: Some(iterations),
        value: (0..env.n_s()).map(|s| solver.v_star(s)).collect(),
        policy: Some((0..env.n_s()).map(|s| solver.pi_star(s).unwrap_or(0)).collect()),
        greedy_return: Some(greedy_return),
    })
}

fn mc_control<E: Simulator>(env: &mut E, config: &Config, args: &McArgs) -> rl::Result<Solution> {
    let mc = config.mc_control;
    let gamma = args.gamma.unwrap_or(mc.gamma);
    let rng = &mut StdRng::seed_from_u64(args.seed.unwrap_or(mc.seed));

    let mut agent = OffPolicyMcControl::for_env(&*env, RandomPolicy::for_env(&*env), gamma);
    if let Some(n) = mc.max_episode_steps {
        agent = agent.with_max_episode_steps(n);
    }
    agent.train(env, args.episodes.unwrap_or(mc.episodes), rng)?;

    let policy = agent.policy().to_vec();
    let value = policy.iter().enumerate().map(|(s, &a)| agent.q(s)[a]).collect();
    let greedy_return = greedy_return(env, &agent, gamma)?;

    Ok(Solution {
        env: env.name().to_string(),
        algorithm: "off-policy-mc-control",
        iterations: Some(agent.episodes()),
        value,
        policy: Some(policy),
        greedy_return: Some(greedy_return),
    })
}

fn print_solution<E: Model + Grid>(env: &E, solution: &Solution, json: bool) -> rl::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(solution)?);
        return Ok(());
    }

    println!("{} | {}", solution.env, solution.algorithm);
    if let Some(n) = solution.iterations {
        println!("iterations: {n}");
    }
    println!("{}", value_table(env, &solution.value));
    if let Some(pi) = &solution.policy {
        println!("{}", policy_arrows(env, pi));
    }
    if let Some(g) = solution.greedy_return {
        println!("greedy return: {g:.2}");
    }

    Ok(())
}

fn bandit(config: &Config, args: &BanditArgs, json: bool) -> rl::Result<()> {
    let bc = config.bandit;
    let selector: Box<dyn ActionSelection> = match args.selector {
        SelectorArg::EpsilonGreedy => Box::new(EpsilonGreedy { epsilon: bc.epsilon }),
        SelectorArg::Ucb => Box::new(Ucb { c: bc.ucb_c }),
        SelectorArg::Softmax => Box::new(Softmax { tau: bc.tau }),
    };

    let result = run_experiment(&*selector, bc.k, bc.runs, bc.steps, args.seed.unwrap_or(bc.seed))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let (reward, optimal) = result.tail_mean(bc.steps / 10);
        println!("{:?} | k={} runs={} steps={}", args.selector, bc.k, bc.runs, bc.steps);
        println!("final average reward: {reward:.3}, optimal action: {optimal:.1}%");
    }

    Ok(())
}

fn main() -> rl::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    info!(command = ?cli.command, "Starting.");

    match &cli.command {
        Command::Evaluate(args) => with_env!(args.env, env => {
            let solution = evaluate(&*env, args.apply(config.policy_evaluation))?;
            print_solution(&*env, &solution, cli.json)
        }),
        Command::PolicyIteration(args) => with_env!(args.env, env => {
            let sc = args.apply(config.policy_iteration);
            let solver = &mut PolicyIteration::new(Rc::new(Mdp::from_model(&*env)?), sc.gamma);
            let solution = solve(env, solver, "policy-iteration", sc)?;
            print_solution(&*env, &solution, cli.json)
        }),
        Command::ValueIteration(args) => with_env!(args.env, env => {
            let sc = args.apply(config.value_iteration);
            let solver = &mut ValueIteration::new(Rc::new(Mdp::from_model(&*env)?), sc.gamma);
            let solution = solve(env, solver, "value-iteration", sc)?;
            print_solution(&*env, &solution, cli.json)
        }),
        Command::McControl(args) => with_env!(args.env, env => {
            let solution = mc_control(env, &config, args)?;
            print_solution(&*env, &solution, cli.json)
        }),
        Command::Bandit(args) => bandit(&config, args, cli.json),
    }
}
