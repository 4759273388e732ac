//! Reward functions.
use crate::RecoError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Reward for an exact prediction.
pub const EXACT_REWARD: f32 = 1.0;

/// Penalty applied to a wrong prediction.
///
/// Both variants give [`EXACT_REWARD`] for an exact prediction; the penalty is only
/// evaluated for a nonzero difference `d = |predicted - actual|`, which lies in `1..=4`.
///
/// The two variants are not interchangeable. `Linear` decreases with `d`, from `-0.2`
/// down to `-0.8`. `Logarithmic` is `ln(d / 5)`, which *increases* with `d`, from about
/// `-1.61` up to about `-0.22`, so a far-off prediction is penalized less than a near
/// miss. It is kept for reproducing earlier experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// `-d / 5`.
    #[default]
    Linear,

    /// `ln(d / 5)`.
    Logarithmic,
}

impl RewardKind {
    /// Returns the reward of predicting `predicted` when the user gave `actual`.
    pub fn reward(&self, predicted: u8, actual: u8) -> f32 {
        let diff = (predicted as i16 - actual as i16).abs();
        if diff == 0 {
            return EXACT_REWARD;
        }
        let diff = diff as f32 / 5.0;
        match self {
            Self::Linear => -diff,
            Self::Logarithmic => diff.ln(),
        }
    }
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Logarithmic => write!(f, "logarithmic"),
        }
    }
}

impl FromStr for RewardKind {
    type Err = RecoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "log" | "logarithmic" => Ok(Self::Logarithmic),
            _ => Err(RecoError::UnknownRewardKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        for kind in [RewardKind::Linear, RewardKind::Logarithmic] {
            for rating in 1..=5 {
                assert_eq!(kind.reward(rating, rating), 1.0);
            }
        }
    }

    #[test]
    fn test_linear_decreases_with_difference() {
        let rewards: Vec<f32> = (1..=5).map(|p| RewardKind::Linear.reward(p, 1)).collect();
        assert_eq!(rewards[0], 1.0);
        assert!((rewards[1] + 0.2).abs() < 1e-6);
        assert!((rewards[4] + 0.8).abs() < 1e-6);
        assert!(rewards.windows(2).all(|w| w[1] < w[0]));

        // symmetric in the sign of the difference
        assert_eq!(RewardKind::Linear.reward(2, 5), RewardKind::Linear.reward(5, 2));
    }

    // The logarithmic penalty is not monotonically decreasing in the difference.
    // A far-off prediction gets a larger reward than a near miss.
    #[test]
    fn test_logarithmic_is_not_decreasing() {
        let rewards: Vec<f32> = (2..=5)
            .map(|p| RewardKind::Logarithmic.reward(p, 1))
            .collect();
        assert!((rewards[0] - 0.2f32.ln()).abs() < 1e-6);
        assert!((rewards[3] - 0.8f32.ln()).abs() < 1e-6);
        assert!(rewards.windows(2).all(|w| w[1] > w[0]));
        assert!(rewards.iter().all(|r| r.is_finite() && *r < 0.0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("linear".parse::<RewardKind>(), Ok(RewardKind::Linear));
        assert_eq!("Log".parse::<RewardKind>(), Ok(RewardKind::Logarithmic));
        assert_eq!(
            "quadratic".parse::<RewardKind>(),
            Err(RecoError::UnknownRewardKind("quadratic".to_string()))
        );
        assert_eq!(RewardKind::Logarithmic.to_string(), "logarithmic");
    }
}
