use super::{AggregateRecorder, Record, Recorder};

/// A recorder that discards every record.
///
/// Useful when a driver such as an evaluation loop requires a recorder but its
/// per-episode output is already returned to the caller.
#[derive(Default)]
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    fn write(&mut self, _record: Record) {}
}

impl AggregateRecorder for NullRecorder {
    fn store(&mut self, _record: Record) {}

    fn flush(&mut self, _step: i64) {}
}
