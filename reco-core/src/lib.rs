#![warn(missing_docs)]
//! Core traits and utilities of the reco workspace.
//!
//! This crate is independent of any particular environment. It defines
//!
//! * [`Env`], [`Obs`], [`Act`], [`Step`] and [`Info`], the interface between an environment
//!   and whatever drives it,
//! * [`Policy`], a mapping from observations to actions,
//! * [`record`], key-value records emitted by environments and aggregated by recorders,
//! * [`Evaluator`] and [`DefaultEvaluator`] for running a policy over whole episodes.
//!
//! The recommendation environment itself lives in `reco-env`.
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{Act, Configurable, Env, Info, Obs, Policy, Step};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};
