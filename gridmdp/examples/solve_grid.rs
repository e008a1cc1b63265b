use anyhow::Result;
use clap::{Parser, ValueEnum};
use gridmdp::{
    core::{
        record::{LogRecorder, Recorder},
        Configurable, DefaultEvaluator, Env as _, Evaluator as _, EPISODE_RETURN, TERMINATION_RATE,
    },
    grid_world::{render_policy, render_values, GridWorld, GridWorldConfig},
    solvers::{
        EpsilonGreedy, PolicyIteration, PolicyIterationConfig, QLearning, QLearningConfig,
        Solution, ValueIteration, ValueIterationConfig,
    },
};
use log::Level;
use std::path::PathBuf;

const N_EPISODES_PER_EVAL: usize = 100;
const MAX_STEPS_PER_EVAL: usize = 200;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    ValueIteration,
    PolicyIteration,
    QLearning,
}

#[derive(Parser, Debug)]
#[command(version, about = "Solves a grid world and prints the values and the policy")]
struct Args {
    /// Solver to run
    #[arg(short, long, value_enum, default_value_t = Algorithm::ValueIteration)]
    algorithm: Algorithm,

    /// Built-in world: world1, world2 or world3
    #[arg(short, long, default_value = "world1")]
    world: String,

    /// Grid world configuration in YAML, overrides --world
    #[arg(long)]
    world_config: Option<PathBuf>,

    /// Solver configuration in YAML; --gamma, --max-iterations and --seed are ignored if given
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Discount factor
    #[arg(short, long, default_value_t = 0.9)]
    gamma: f64,

    /// Sweeps, outer iterations or episodes, depending on the solver
    #[arg(short, long, default_value_t = 100)]
    max_iterations: usize,

    /// Probability of slipping sideways
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Reward of every move
    #[arg(long, default_value_t = 0.0)]
    step_reward: f64,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Log every iteration at info level, including the value function and policy
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn world_config(args: &Args) -> Result<GridWorldConfig> {
    match &args.world_config {
        Some(path) => GridWorldConfig::load(path),
        None => Ok(GridWorldConfig::named(&args.world)?
            .noise(args.noise)
            .step_reward(args.step_reward)),
    }
}

fn solve(args: &Args, env: &mut GridWorld, recorder: &mut dyn Recorder) -> Result<Solution> {
    match args.algorithm {
        Algorithm::ValueIteration => {
            let solver = match &args.config {
                Some(path) => ValueIteration::build_from_path(path)?,
                None => ValueIteration::build(
                    ValueIterationConfig::default()
                        .gamma(args.gamma)
                        .max_iterations(args.max_iterations),
                ),
            };
            solver.solve(&*env, recorder)
        }
        Algorithm::PolicyIteration => {
            let solver = match &args.config {
                Some(path) => PolicyIteration::build_from_path(path)?,
                None => PolicyIteration::build(
                    PolicyIterationConfig::default()
                        .gamma(args.gamma)
                        .max_iterations(args.max_iterations)
                        .seed(args.seed),
                ),
            };
            solver.solve(&*env, recorder)
        }
        Algorithm::QLearning => {
            let solver = match &args.config {
                Some(path) => QLearning::build_from_path(path)?,
                None => QLearning::build(
                    QLearningConfig::default()
                        .gamma(args.gamma)
                        .max_iterations(args.max_iterations)
                        .explorer(
                            EpsilonGreedy::default()
                                .eps_start(0.8)
                                .eps_final(0.05)
                                .final_episode(args.max_iterations / 2),
                        )
                        .seed(args.seed),
                ),
            };
            solver.solve(env, recorder)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = world_config(&args)?;
    let mut env = GridWorld::build(&config, args.seed as i64)?;
    let mut recorder = LogRecorder::new(format!("{:?}", args.algorithm))
        .level(if args.verbose { Level::Info } else { Level::Debug })
        .with_arrays(args.verbose);

    let solution = solve(&args, &mut env, &mut recorder)?;

    println!("Values after {} iterations:", solution.iterations);
    println!("{}", render_values(env.layout(), &solution.values));
    println!();
    println!("Policy:");
    println!("{}", render_policy(env.layout(), solution.policy.actions()));

    let mut policy = solution.policy;
    let mut evaluator = DefaultEvaluator::new(env, N_EPISODES_PER_EVAL, MAX_STEPS_PER_EVAL)?;
    let record = evaluator.evaluate(&mut policy)?;
    println!();
    println!(
        "Average return over {} episodes: {:.3} (terminated: {:.0}%)",
        N_EPISODES_PER_EVAL,
        record.get_scalar(EPISODE_RETURN)?,
        100.0 * record.get_scalar(TERMINATION_RATE)?
    );

    Ok(())
}
