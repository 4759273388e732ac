//! Record storage and aggregation.
use super::{Record, RecordValue};
use log::warn;
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// A storage of records with aggregation.
///
/// Scalars stored under the same key are summarized as `<key>_min`, `<key>_max`,
/// `<key>_mean` and `<key>_median`; a key seen only once keeps its value as is.
/// For the other value types the most recent value is kept.
///
/// Under a key whose latest value is a scalar, values of other types are skipped with a
/// warning.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().copied().fold(f32::INFINITY, f32::min))
}

fn max(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().copied().fold(f32::NEG_INFINITY, f32::max))
}

fn mean(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().sum::<f32>() / vs.len() as f32)
}

// Upper median for an even number of values.
fn median(mut vs: Vec<f32>) -> RecordValue {
    vs.sort_by(|x, y| x.total_cmp(y));
    RecordValue::Scalar(vs[vs.len() / 2])
}

impl RecordStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn get_keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            for k in record.keys() {
                keys.insert(k.clone());
            }
        }
        keys
    }

    fn latest(&self, key: &str) -> Option<&RecordValue> {
        self.data.iter().rev().find_map(|record| record.get(key))
    }

    fn scalar(&self, key: &str) -> Record {
        let vs: Vec<f32> = self
            .data
            .iter()
            .filter_map(|record| match record.get(key) {
                Some(RecordValue::Scalar(v)) => Some(*v),
                Some(_) => {
                    warn!("Skip a non-scalar value for {} in aggregation", key);
                    None
                }
                None => None,
            })
            .collect();

        if vs.len() == 1 {
            Record::from_scalar(key, vs[0])
        } else {
            Record::from_slice(&[
                (format!("{}_min", key), min(&vs)),
                (format!("{}_max", key), max(&vs)),
                (format!("{}_mean", key), mean(&vs)),
                (format!("{}_median", key), median(vs)),
            ])
        }
    }

    /// Aggregates all stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.get_keys().iter() {
            let r = match self.latest(key) {
                Some(RecordValue::Scalar(..)) => self.scalar(key),
                Some(value) => Record::from_slice(&[(key.clone(), value.clone())]),
                None => continue,
            };
            record.merge_inplace(r);
        }

        self.data.clear();

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_scalars() {
        let mut storage = RecordStorage::new();
        for r in [1.0, -0.2, -0.4, 1.0] {
            storage.store(Record::from_scalar("reward", r));
        }
        storage.store(Record::from_slice(&[(
            "env",
            RecordValue::String("reco-v0".to_string()),
        )]));

        let record = storage.aggregate();
        assert_eq!(record.get_scalar("reward_min").unwrap(), -0.4);
        assert_eq!(record.get_scalar("reward_max").unwrap(), 1.0);
        assert!((record.get_scalar("reward_mean").unwrap() - 0.35).abs() < 1e-6);
        assert_eq!(record.get_scalar("reward_median").unwrap(), 1.0);
        assert_eq!(record.get_string("env").unwrap(), "reco-v0");
        assert!(storage.is_empty());
    }

    #[test]
    fn test_mixed_types_skipped() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("accuracy", 0.5));
        storage.store(Record::from_slice(&[(
            "accuracy",
            RecordValue::String("n/a".to_string()),
        )]));
        storage.store(Record::from_scalar("accuracy", 1.0));

        let record = storage.aggregate();
        assert_eq!(record.get_scalar("accuracy_min").unwrap(), 0.5);
        assert_eq!(record.get_scalar("accuracy_max").unwrap(), 1.0);
        assert_eq!(record.get_scalar("accuracy_mean").unwrap(), 0.75);
    }

    #[test]
    fn test_single_scalar_kept() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("accuracy", 0.25));
        let record = storage.aggregate();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get_scalar("accuracy").unwrap(), 0.25);
    }
}
