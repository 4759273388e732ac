//! Records emitted by environments and consumed by recorders.
//!
//! An environment returns a [`Record`] together with every [`Step`](crate::Step).
//! The record of [`RecoEnv`] for example carries the reward, the cursor position
//! and the running number of correct predictions. Recorders decide what happens
//! to the records:
//!
//! * [`BufferedRecorder`] keeps them in memory, e.g., for writing a CSV file after
//!   an evaluation run,
//! * [`NullRecorder`] discards them,
//! * [`LogRecorder`] stores them in a [`RecordStorage`] and, on flush, writes
//!   aggregated values (min, max, mean, median) to the log.
//!
//! ```rust
//! use reco_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("cursor", RecordValue::Scalar(3.0));
//! record.insert("reward", RecordValue::Scalar(-0.2));
//! record.insert("obs", RecordValue::Array1(vec![0.8, 0.6, 1.0]));
//!
//! assert_eq!(record.get_scalar("reward").unwrap(), -0.2);
//! ```
//!
//! [`RecoEnv`]: https://docs.rs/reco-env
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
