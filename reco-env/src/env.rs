//! Rating-prediction environment.
mod config;
use crate::{
    FeatureTables, ItemRecord, MovieLens, RatingRecord, RecoAct, RecoError, RecoObs, RewardKind,
    UserRecord, N_ACTS,
};
use anyhow::Result;
pub use config::RecoEnvConfig;
use log::{info, trace};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use reco_core::{
    record::{Record, RecordValue::Scalar},
    Env, Info, Step,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

/// Identifier of the environment.
pub const ENV_ID: &str = "reco-v0";

/// Information given at every step of the interaction with the environment.
///
/// Currently, it is empty and used to match the type signature.
#[derive(Debug, Clone, Default)]
pub struct RecoInfo {}

impl Info for RecoInfo {}

/// Rendering mode of [`RecoEnv::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Renders nothing.
    Human,

    /// Logs the cursor and the last observation.
    Logger,
}

impl FromStr for RenderMode {
    type Err = RecoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "logger" => Ok(Self::Logger),
            _ => Err(RecoError::UnknownRenderMode(s.to_string())),
        }
    }
}

/// Bounds and shape of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSpace {
    /// Lower bound of every feature.
    pub low: f32,
    /// Upper bound of every feature.
    pub high: f32,
    pub shape: Vec<usize>,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Environment predicting the ratings of a rating table row by row.
///
/// An episode is a pass over the rating table from row `0` to row `max_step`, where
/// `max_step` is the number of rows minus two. At every step the environment evaluates
/// the action against the row under the cursor, returns the observation of that row
/// and moves the cursor to the next row.
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Active
///     Active --> Active: step, cursor < max_step
///     Active --> Terminal: step, cursor reaches max_step
///     Terminal --> Active: step, resets and repeats the last reward
///     Active --> Active: reset
///     Terminal --> Active: reset
/// ```
///
/// A step on a terminal environment is a no-op: it resets the environment and returns
/// the observation of row `0` together with the reward and the terminal flag of the
/// last real step.
pub struct RecoEnv {
    tables: Arc<FeatureTables>,

    reward_kind: RewardKind,

    observation_space: ObservationSpace,

    // Row evaluated by the next step, in `0..=max_step`.
    cursor: usize,

    max_step: usize,

    done: bool,

    // Reward of the last step.
    reward: f32,

    // Observation of the last step or reset.
    observation: Option<RecoObs>,

    total_correct_predictions: usize,

    seed: i64,

    rng: SmallRng,
}

impl RecoEnv {
    /// Constructs the environment from the three tables.
    ///
    /// No I/O is done here; use [`MovieLens::load`] to read the tables.
    pub fn new(
        ratings: Vec<RatingRecord>,
        items: &[ItemRecord],
        users: &[UserRecord],
        seed: i64,
    ) -> Result<Self> {
        Self::from_tables(Arc::new(FeatureTables::new(ratings, items, users)), seed)
    }

    /// Constructs the environment sharing already built tables.
    pub fn from_tables(tables: Arc<FeatureTables>, seed: i64) -> Result<Self> {
        let n_rows = tables.len();
        if n_rows < 3 {
            return Err(RecoError::DatasetTooSmall(n_rows).into());
        }

        // Fixes the shape of the observation space.
        let obs = tables.observation(0)?;
        let observation_space = ObservationSpace {
            low: -1.0,
            high: 5.0,
            shape: vec![obs.dim()],
        };
        info!(
            "Build {}: {} ratings, {} occupations, observation dim = {}",
            ENV_ID,
            n_rows,
            tables.occupations().len(),
            obs.dim()
        );

        Ok(Self {
            tables,
            reward_kind: RewardKind::default(),
            observation_space,
            cursor: 0,
            max_step: n_rows - 2,
            done: false,
            reward: 0.0,
            observation: None,
            total_correct_predictions: 0,
            seed,
            rng: SmallRng::seed_from_u64(seed as u64),
        })
    }

    /// Sets the reward function.
    pub fn with_reward(mut self, reward_kind: RewardKind) -> Self {
        self.reward_kind = reward_kind;
        self
    }

    /// Tables of the environment, which can be shared with [`RecoEnv::from_tables`].
    pub fn tables(&self) -> &Arc<FeatureTables> {
        &self.tables
    }

    pub fn observation_space(&self) -> &ObservationSpace {
        &self.observation_space
    }

    /// The number of discrete actions.
    pub fn n_acts(&self) -> usize {
        N_ACTS as usize
    }

    pub fn reward_kind(&self) -> RewardKind {
        self.reward_kind
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The last cursor position of an episode.
    pub fn max_step(&self) -> usize {
        self.max_step
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The number of exact predictions since the last reset.
    pub fn total_correct_predictions(&self) -> usize {
        self.total_correct_predictions
    }

    /// Reward of predicting `act` for row `cursor`.
    pub fn reward_at(&self, act: &RecoAct, cursor: usize) -> Result<f32, RecoError> {
        let predicted = act.rating()?;
        let actual = self.tables.rating(cursor)?;
        Ok(self.reward_kind.reward(predicted, actual))
    }

    /// Observation of row `cursor`.
    pub fn observation_at(&self, cursor: usize) -> Result<RecoObs, RecoError> {
        self.tables.observation(cursor)
    }

    /// Renders the environment.
    pub fn render(&self, mode: RenderMode) {
        if mode == RenderMode::Logger {
            info!(
                "Env observation at step {} is {:?}",
                self.cursor,
                self.observation.as_ref().map(|o| o.as_slice())
            );
        }
    }

    /// Reseeds the random number generator and returns the seed.
    pub fn seed(&mut self, seed: i64) -> Vec<i64> {
        self.rng = SmallRng::seed_from_u64(seed as u64);
        self.seed = seed;
        vec![seed]
    }

    /// Samples an action uniformly with the random number generator of the environment.
    pub fn sample_act(&mut self) -> RecoAct {
        RecoAct::new(self.rng.gen_range(0..N_ACTS))
    }

    fn make_step(
        &self,
        obs: RecoObs,
        act: RecoAct,
        reward: f32,
        done: bool,
    ) -> (Step<Self>, Record) {
        let record = Record::from_slice(&[
            ("reward", Scalar(reward)),
            ("cursor", Scalar(self.cursor as _)),
            (
                "total_correct_predictions",
                Scalar(self.total_correct_predictions as _),
            ),
        ]);
        let step = Step::new(
            obs,
            act,
            vec![reward],
            vec![done as i8],
            vec![0],
            RecoInfo {},
            None,
        );
        (step, record)
    }
}

impl Env for RecoEnv {
    type Config = RecoEnvConfig;
    type Obs = RecoObs;
    type Act = RecoAct;
    type Info = RecoInfo;

    /// Loads the tables from `config.data_dir` and constructs the environment.
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let data = MovieLens::load(&config.data_dir)?;
        make_env(&data, config, seed)
    }

    fn step(&mut self, act: &Self::Act) -> Result<(Step<Self>, Record)> {
        if self.done {
            let (reward, done) = (self.reward, self.done);
            let obs = self.reset()?;
            return Ok(self.make_step(obs, *act, reward, done));
        }

        let reward = self.reward_at(act, self.cursor)?;
        let obs = self.observation_at(self.cursor)?;
        trace!(
            "step: cursor = {}, act = {}, reward = {}",
            self.cursor,
            act.act,
            reward
        );

        self.reward = reward;
        self.observation = Some(obs.clone());
        if reward > 0.0 {
            self.total_correct_predictions += 1;
        }
        self.cursor += 1;
        if self.cursor >= self.max_step {
            self.done = true;
            info!(
                "Episode finished after {} steps, total correct = {}",
                self.cursor, self.total_correct_predictions
            );
        }

        Ok(self.make_step(obs, *act, reward, self.done))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        info!(
            "Reset {}: first step = 0, total correct = {}",
            ENV_ID, self.total_correct_predictions
        );
        self.cursor = 0;
        self.reward = 0.0;
        self.done = false;
        self.total_correct_predictions = 0;

        let obs = self.observation_at(0)?;
        self.observation = Some(obs.clone());
        Ok(obs)
    }

    /// Reseeds the environment with `ix` and resets it.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.seed(ix as i64);
        self.reset()
    }
}

impl fmt::Display for RecoEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (seed = {})", ENV_ID, self.seed)
    }
}

/// Constructs [`RecoEnv`] from loaded tables and a configuration.
///
/// This is the factory for environments sharing one loaded dataset, e.g., one for
/// training and one for evaluation.
pub fn make_env(data: &MovieLens, config: &RecoEnvConfig, seed: i64) -> Result<RecoEnv> {
    let ratings = match config.max_rows {
        Some(n) => data.ratings.iter().take(n).cloned().collect(),
        None => data.ratings.clone(),
    };
    Ok(RecoEnv::new(ratings, &data.items, &data.users, seed)?.with_reward(config.reward))
}
