//! Action of [`RecoEnv`](crate::RecoEnv).
use crate::RecoError;
use reco_core::Act;

/// The number of actions, one per star rating.
pub const N_ACTS: u8 = 5;

/// A predicted rating.
///
/// `act` is zero-based: `0` predicts one star and `4` predicts five stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoAct {
    pub act: u8,
}

impl RecoAct {
    pub fn new(act: u8) -> Self {
        Self { act }
    }

    /// Constructs an action predicting `rating` stars.
    pub fn from_rating(rating: u8) -> Result<Self, RecoError> {
        match rating {
            1..=5 => Ok(Self { act: rating - 1 }),
            _ => Err(RecoError::InvalidAction(rating.wrapping_sub(1), N_ACTS)),
        }
    }

    /// The predicted rating in `1..=5`.
    pub fn rating(&self) -> Result<u8, RecoError> {
        if self.act < N_ACTS {
            Ok(self.act + 1)
        } else {
            Err(RecoError::InvalidAction(self.act, N_ACTS))
        }
    }
}

impl Act for RecoAct {
    fn len(&self) -> usize {
        1
    }
}

impl From<u8> for RecoAct {
    fn from(act: u8) -> Self {
        Self { act }
    }
}
