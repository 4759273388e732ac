use anyhow::Result;
use clap::{Parser, ValueEnum};
use reco::{
    evaluate, write_csv, EvalConfig, MeanRatingPolicy, MeanRatingPolicyConfig, RandomPolicy,
    RandomPolicyConfig,
};
use reco_core::{record::LogRecorder, Configurable, Policy};
use reco_env::{make_env, MovieLens, RecoEnv, RecoEnvConfig, RewardKind};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyKind {
    Random,
    Mean,
}

/// Evaluates a baseline policy on the MovieLens rating-prediction environment
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory with u.data, u.item and u.user, defaults to $RECO_DATA_DIR or ~/.reco/ml-100k
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Number of evaluation steps
    #[arg(long, default_value_t = 100_000)]
    steps: usize,

    /// Random seed
    #[arg(long, default_value_t = 1)]
    seed: i64,

    /// Reward function, `linear` or `log`
    #[arg(long, default_value = "linear")]
    reward: RewardKind,

    /// Policy to evaluate
    #[arg(long, value_enum, default_value_t = PolicyKind::Mean)]
    policy: PolicyKind,

    /// Weight of the user mean rating in the mean-rating policy
    #[arg(long, default_value_t = 0.5)]
    user_weight: f32,

    /// Render the environment every given number of steps
    #[arg(long)]
    render_interval: Option<usize>,

    /// Only use the first rows of the rating table
    #[arg(long)]
    max_rows: Option<usize>,

    /// Write episode statistics to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn run<P: Policy<RecoEnv>>(args: &Args, env: &mut RecoEnv, policy: &mut P) -> Result<()> {
    let config = EvalConfig::default()
        .n_steps(args.steps)
        .render_interval(args.render_interval);
    let mut recorder = LogRecorder::new("eval_reco");
    let stats = evaluate(policy, env, &config, &mut recorder)?;

    if let Some(path) = &args.csv {
        write_csv(path, &stats)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut env_config = RecoEnvConfig::default()
        .reward(args.reward)
        .max_rows(args.max_rows);
    if let Some(dir) = &args.data_dir {
        env_config = env_config.data_dir(dir);
    }
    let data = MovieLens::load(&env_config.data_dir)?;
    let mut env = make_env(&data, &env_config, args.seed)?;

    match args.policy {
        PolicyKind::Random => {
            let config = RandomPolicyConfig {
                seed: Some(args.seed as u64),
            };
            run(&args, &mut env, &mut RandomPolicy::build(config))
        }
        PolicyKind::Mean => {
            let config = MeanRatingPolicyConfig::default().user_weight(args.user_weight);
            run(&args, &mut env, &mut MeanRatingPolicy::build(config))
        }
    }
}
