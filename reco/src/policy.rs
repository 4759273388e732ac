//! Baseline policies on [`RecoEnv`].
use reco_core::{Configurable, Policy};
use reco_env::{RecoAct, RecoEnv, RecoObs, N_ACTS};
use serde::{Deserialize, Serialize};

/// Configuration of [`RandomPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandomPolicyConfig {
    /// Seed of the random number generator. A random seed is used if `None`.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Predicts a rating uniformly at random.
pub struct RandomPolicy {
    rng: fastrand::Rng,
}

impl Policy<RecoEnv> for RandomPolicy {
    fn sample(&mut self, _: &RecoObs) -> RecoAct {
        RecoAct::new(self.rng.u8(..N_ACTS))
    }
}

impl Configurable<RecoEnv> for RandomPolicy {
    type Config = RandomPolicyConfig;

    fn build(config: Self::Config) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng }
    }
}

fn default_user_weight() -> f32 {
    0.5
}

/// Configuration of [`MeanRatingPolicy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanRatingPolicyConfig {
    /// Weight of the user mean rating, the movie mean rating gets `1 - user_weight`.
    #[serde(default = "default_user_weight")]
    pub user_weight: f32,
}

impl Default for MeanRatingPolicyConfig {
    fn default() -> Self {
        Self {
            user_weight: default_user_weight(),
        }
    }
}

impl MeanRatingPolicyConfig {
    /// Sets the weight of the user mean rating.
    pub fn user_weight(mut self, v: f32) -> Self {
        self.user_weight = v;
        self
    }
}

/// Predicts the rounded blend of the mean ratings in the observation.
///
/// The first two features of [`RecoObs`] are the mean rating of the user and of the
/// movie, both divided by 5.
pub struct MeanRatingPolicy {
    user_weight: f32,
}

impl MeanRatingPolicy {
    /// The predicted rating in `1..=5` for an observation.
    pub fn predict(&self, obs: &RecoObs) -> u8 {
        let (user_mean, movie_mean) = match obs.as_slice() {
            [u, m, ..] => (*u, *m),
            _ => (0.6, 0.6),
        };
        let w = self.user_weight.max(0.0).min(1.0);
        let blend = 5.0 * (w * user_mean + (1.0 - w) * movie_mean);
        blend.round().max(1.0).min(5.0) as u8
    }
}

impl Policy<RecoEnv> for MeanRatingPolicy {
    fn sample(&mut self, obs: &RecoObs) -> RecoAct {
        RecoAct::new(self.predict(obs) - 1)
    }
}

impl Configurable<RecoEnv> for MeanRatingPolicy {
    type Config = MeanRatingPolicyConfig;

    fn build(config: Self::Config) -> Self {
        Self {
            user_weight: config.user_weight,
        }
    }
}
