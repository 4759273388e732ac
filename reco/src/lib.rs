//! Baseline policies and an evaluation driver for [`reco_env::RecoEnv`].
//!
//! * [`RandomPolicy`] predicts ratings uniformly at random,
//! * [`MeanRatingPolicy`] predicts the rounded blend of the user and movie mean ratings
//!   found at the head of the observation,
//! * [`evaluate`] runs a policy for a number of steps and reports, per episode, the
//!   number of steps, steps per second, correct predictions and prediction accuracy.
//!
//! ```no_run
//! use anyhow::Result;
//! use reco::{evaluate, EvalConfig, MeanRatingPolicy, MeanRatingPolicyConfig};
//! use reco_core::{record::LogRecorder, Configurable, Env as _};
//! use reco_env::{RecoEnv, RecoEnvConfig};
//!
//! fn main() -> Result<()> {
//!     let mut env = RecoEnv::build(&RecoEnvConfig::default(), 1)?;
//!     let mut policy = MeanRatingPolicy::build(MeanRatingPolicyConfig::default());
//!     let mut recorder = LogRecorder::new("eval");
//!     let config = EvalConfig::default().n_steps(100_000);
//!     let stats = evaluate(&mut policy, &mut env, &config, &mut recorder)?;
//!     println!("{:?}", stats.last());
//!     Ok(())
//! }
//! ```
mod evaluate;
mod policy;
pub use evaluate::{evaluate, write_csv, EpisodeStats, EvalConfig};
pub use policy::{
    MeanRatingPolicy, MeanRatingPolicyConfig, RandomPolicy, RandomPolicyConfig,
};
