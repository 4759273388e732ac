//! Policy.
use super::Env;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

/// Maps an observation of an environment to an action.
///
/// Policies are not trained in this workspace: implementations are fixed baselines,
/// possibly stochastic, and only need `&mut self` to advance their own random state.
pub trait Policy<E: Env> {
    /// Returns the action taken for `obs`.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}

/// A policy built from a deserializable configuration.
///
/// The baseline policies of the `reco` crate implement this, with configs such as
///
/// ```yaml
/// # MeanRatingPolicyConfig
/// user_weight: 0.7
/// ```
///
/// or `seed: 42` for the random policy. Omitted fields take their defaults.
pub trait Configurable<E: Env> {
    /// Configuration.
    type Config: Clone + DeserializeOwned;

    /// Builds the object.
    fn build(config: Self::Config) -> Self;

    /// Builds the object with the configuration in the YAML file at `path`.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let rdr = BufReader::new(file);
        let config: Self::Config = serde_yaml::from_reader(rdr)
            .with_context(|| format!("Failed to parse policy config {:?}", path))?;
        Ok(Self::build(config))
    }
}
