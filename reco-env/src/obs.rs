//! Observation of [`RecoEnv`](crate::RecoEnv).
use ndarray::{Array1, ArrayView1};
use reco_core::Obs;

/// Feature vector of a user-movie pair.
///
/// See the [crate documentation](crate) for the layout of the features.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoObs(Array1<f32>);

impl RecoObs {
    /// Returns a view of the feature vector.
    pub fn view(&self) -> ArrayView1<f32> {
        self.0.view()
    }

    /// Returns the features as a slice.
    pub fn as_slice(&self) -> &[f32] {
        // An owned 1-d array built by this crate is always contiguous.
        self.0.as_slice().unwrap_or(&[])
    }

    /// The number of features.
    pub fn dim(&self) -> usize {
        self.0.len()
    }
}

impl Obs for RecoObs {
    fn len(&self) -> usize {
        1
    }
}

impl From<Array1<f32>> for RecoObs {
    fn from(obs: Array1<f32>) -> Self {
        Self(obs)
    }
}

impl From<Vec<f32>> for RecoObs {
    fn from(obs: Vec<f32>) -> Self {
        Self(Array1::from(obs))
    }
}

impl From<RecoObs> for Vec<f32> {
    fn from(obs: RecoObs) -> Self {
        obs.0.to_vec()
    }
}
