//! Configuration of [`RecoEnv`](super::RecoEnv).
//!
//! If environment variable `RECO_DATA_DIR` exists, it is used as the default directory
//! from which the MovieLens files are loaded. Otherwise the default is `~/.reco/ml-100k`.
use crate::RewardKind;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

fn default_data_dir() -> PathBuf {
    if let Ok(var) = env::var("RECO_DATA_DIR") {
        return PathBuf::from(var);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".reco").join("ml-100k"),
        None => PathBuf::from("ml-100k"),
    }
}

/// Configuration of [`RecoEnv`](super::RecoEnv).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoEnvConfig {
    /// Directory with `u.data`, `u.item` and `u.user`.
    pub data_dir: PathBuf,

    /// Reward function.
    #[serde(default)]
    pub reward: RewardKind,

    /// If given, only the first `max_rows` rows of the rating table are used.
    #[serde(default)]
    pub max_rows: Option<usize>,
}

impl Default for RecoEnvConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            reward: RewardKind::default(),
            max_rows: None,
        }
    }
}

impl RecoEnvConfig {
    /// Sets the data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the reward function.
    pub fn reward(mut self, reward: RewardKind) -> Self {
        self.reward = reward;
        self
    }

    /// Limits the number of rating rows.
    pub fn max_rows(mut self, v: Option<usize>) -> Self {
        self.max_rows = v;
        self
    }

    /// Constructs [`RecoEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves [`RecoEnvConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
