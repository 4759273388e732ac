//! A rating-prediction environment built from MovieLens-style tables.
//!
//! [`RecoEnv`] walks through the rows of a rating table in a fixed order. At every step
//! the agent observes features of the user-movie pair of the current row and predicts the
//! star rating the user gave (action `0..5` stands for rating `1..=5`). Exact predictions
//! are rewarded with `+1`, wrong ones with a penalty depending on [`RewardKind`].
//!
//! The observation ([`RecoObs`]) is a fixed-length `f32` vector:
//!
//! | features            | width                     |
//! |---------------------|---------------------------|
//! | user mean rating / 5| 1                         |
//! | movie mean rating / 5 | 1                       |
//! | movie genres        | 19                        |
//! | user age bucket     | 7                         |
//! | user occupation     | number of occupations     |
//! | user gender         | 2                         |
//!
//! Tables are read from the MovieLens-100k file layout by [`MovieLens::load`].
//!
//! ```no_run
//! use anyhow::Result;
//! use reco_core::Env as _;
//! use reco_env::{RecoAct, RecoEnv, RecoEnvConfig, RewardKind};
//!
//! fn main() -> Result<()> {
//!     let config = RecoEnvConfig::default()
//!         .data_dir("/data/ml-100k")
//!         .reward(RewardKind::Linear);
//!     let mut env = RecoEnv::build(&config, 42)?;
//!
//!     let _obs = env.reset()?;
//!     let (step, _record) = env.step(&RecoAct::new(3))?;
//!     println!("reward = {}", step.reward[0]);
//!     Ok(())
//! }
//! ```
mod act;
mod dataset;
mod env;
mod error;
mod features;
mod obs;
mod reward;
pub mod util;
pub use act::{RecoAct, N_ACTS};
pub use dataset::{
    column_names, ItemRecord, MovieLens, RatingRecord, UserRecord, DATA_HEADER, ITEM_HEADER,
    USER_HEADER,
};
pub use env::{make_env, ObservationSpace, RecoEnv, RecoEnvConfig, RecoInfo, RenderMode, ENV_ID};
pub use error::RecoError;
pub use features::{
    age_bucket, gender_bucket, one_hot, FeatureTables, GenreTable, MeanRatings, OccupationVocab,
    UserProfile, UserTable, DEFAULT_MEAN_RATING, N_AGE_BUCKETS, N_GENDERS, N_GENRES,
};
pub use obs::RecoObs;
pub use reward::RewardKind;
