use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::info;

/// A recorder writing aggregated records to the log.
///
/// Records passed to [`AggregateRecorder::store`] are kept in a [`RecordStorage`].
/// [`AggregateRecorder::flush`] aggregates them and writes one log line with keys in
/// alphabetical order. [`Recorder::write`] logs a record immediately.
pub struct LogRecorder {
    name: String,
    storage: RecordStorage,
}

impl LogRecorder {
    /// Constructs a recorder. `name` prefixes every log line.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: RecordStorage::new(),
        }
    }

    /// Returns `true` if no record is waiting for [`AggregateRecorder::flush`].
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Formats a record as `k = v` pairs sorted by key. Scalars have four decimals.
    pub fn format(record: &Record) -> String {
        let mut items: Vec<_> = record.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        items
            .into_iter()
            .map(|(k, v)| match v {
                RecordValue::Scalar(v) => format!("{} = {:.4}", k, v),
                RecordValue::DateTime(v) => format!("{} = {}", k, v),
                RecordValue::Array1(v) => format!("{} = {:?}", k, v),
                RecordValue::String(v) => format!("{} = {}", k, v),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        info!("[{}] {}", self.name, Self::format(&record));
    }
}

impl AggregateRecorder for LogRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if let Some(line) = self.aggregate_line(step) {
            info!("{}", line);
        }
    }
}

impl LogRecorder {
    // Aggregates and clears the storage, `None` if nothing was stored.
    fn aggregate_line(&mut self, step: i64) -> Option<String> {
        if self.storage.is_empty() {
            return None;
        }
        let record = self.storage.aggregate();
        Some(format!(
            "[{}] step = {}, {}",
            self.name,
            step,
            Self::format(&record)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sorted() {
        let record = Record::from_slice(&[
            ("steps", RecordValue::Scalar(6.0)),
            ("accuracy", RecordValue::Scalar(0.5)),
            ("env", RecordValue::String("reco-v0".to_string())),
            ("obs", RecordValue::Array1(vec![0.5, 1.0])),
        ]);
        assert_eq!(
            LogRecorder::format(&record),
            "accuracy = 0.5000, env = reco-v0, obs = [0.5, 1.0], steps = 6.0000"
        );
        assert_eq!(LogRecorder::format(&Record::empty()), "");
    }

    #[test]
    fn test_flush_empty_is_noop() {
        let mut recorder = LogRecorder::new("eval");
        assert!(recorder.is_empty());
        assert_eq!(recorder.aggregate_line(10), None);
        recorder.flush(10);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_flush_aggregates_and_clears() {
        let mut recorder = LogRecorder::new("eval");
        recorder.store(Record::from_scalar("accuracy", 0.25));
        recorder.store(Record::from_scalar("accuracy", 0.75));
        assert!(!recorder.is_empty());

        assert_eq!(
            recorder.aggregate_line(12).unwrap(),
            "[eval] step = 12, accuracy_max = 0.7500, accuracy_mean = 0.5000, \
             accuracy_median = 0.7500, accuracy_min = 0.2500"
        );
        assert!(recorder.is_empty());
        assert_eq!(recorder.aggregate_line(13), None);

        recorder.store(Record::from_scalar("accuracy", 1.0));
        recorder.flush(14);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_write_does_not_store() {
        let mut recorder = LogRecorder::new("eval");
        recorder.write(Record::from_scalar("reward", 1.0));
        assert!(recorder.is_empty());
    }
}
