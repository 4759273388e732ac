use anyhow::Result;
use reco::{
    evaluate, write_csv, EpisodeStats, EvalConfig, MeanRatingPolicy, MeanRatingPolicyConfig,
    RandomPolicy, RandomPolicyConfig,
};
use reco_core::{
    record::{AggregateRecorder, NullRecorder, Record, RecordStorage},
    Configurable, DefaultEvaluator, Evaluator as _, Policy,
};
use reco_env::{util::test::dataset, RecoAct, RecoEnv, RecoObs};
use std::convert::TryFrom;
use tempdir::TempDir;

const RATINGS: [u8; 8] = [5, 3, 4, 1, 2, 5, 3, 4];

fn env() -> Result<RecoEnv> {
    let _ = env_logger::builder().is_test(true).try_init();
    let data = dataset()?;
    RecoEnv::new(data.ratings, &data.items, &data.users, 1)
}

/// Predicts the fixture ratings in order, restarting with every episode.
struct OraclePolicy {
    t: usize,
    episode_len: usize,
}

impl Policy<RecoEnv> for OraclePolicy {
    fn sample(&mut self, _: &RecoObs) -> RecoAct {
        let act = RecoAct::new(RATINGS[self.t] - 1);
        self.t = (self.t + 1) % self.episode_len;
        act
    }
}

#[derive(Default)]
struct StoringRecorder {
    records: Vec<Record>,
    flushed: Vec<i64>,
}

impl AggregateRecorder for StoringRecorder {
    fn store(&mut self, record: Record) {
        self.records.push(record);
    }

    fn flush(&mut self, step: i64) {
        self.flushed.push(step);
    }
}

#[test]
fn test_oracle_accuracy() -> Result<()> {
    let mut env = env()?;
    let mut policy = OraclePolicy {
        t: 0,
        episode_len: env.max_step(),
    };
    let mut recorder = StoringRecorder::default();
    let config = EvalConfig::default().n_steps(13).render_interval(Some(5));

    let stats = evaluate(&mut policy, &mut env, &config, &mut recorder)?;
    assert_eq!(stats.len(), 2);
    for (i, s) in stats.iter().enumerate() {
        assert_eq!(s.episode, i + 1);
        assert_eq!(s.steps, 6);
        assert_eq!(s.correct, 6);
        assert_eq!(s.accuracy, 1.0);
        assert!(s.steps_per_sec > 0.0);
    }

    assert_eq!(recorder.flushed, vec![13]);
    assert_eq!(recorder.records.len(), 2);
    assert_eq!(EpisodeStats::try_from(&recorder.records[1])?, stats[1]);

    let t0 = recorder.records[0].get_datetime("finished_at")?;
    let t1 = recorder.records[1].get_datetime("finished_at")?;
    assert!(t0 <= t1);
    Ok(())
}

#[test]
fn test_accuracy_is_correct_over_steps() -> Result<()> {
    let mut env = env()?;
    let mut policy = RandomPolicy::build(RandomPolicyConfig { seed: Some(42) });
    let config = EvalConfig::default().n_steps(60);

    let stats = evaluate(&mut policy, &mut env, &config, &mut NullRecorder::default())?;
    assert_eq!(stats.len(), 10);
    for s in stats.iter() {
        assert_eq!(s.steps, 6);
        assert!(s.correct <= s.steps);
        assert!((s.accuracy - s.correct as f32 / s.steps as f32).abs() < 1e-6);
    }
    Ok(())
}

#[test]
fn test_unfinished_episode_not_reported() -> Result<()> {
    let mut env = env()?;
    let mut policy = MeanRatingPolicy::build(MeanRatingPolicyConfig::default());
    let config = EvalConfig::default().n_steps(5);

    let stats = evaluate(&mut policy, &mut env, &config, &mut NullRecorder::default())?;
    assert!(stats.is_empty());
    assert_eq!(env.cursor(), 5);
    Ok(())
}

#[test]
fn test_aggregate_with_storage() -> Result<()> {
    let mut env = env()?;
    let mut policy = OraclePolicy {
        t: 0,
        episode_len: env.max_step(),
    };
    let mut storage = RecordStorage::new();
    let stats = evaluate(
        &mut policy,
        &mut env,
        &EvalConfig::default().n_steps(18),
        &mut NullRecorder::default(),
    )?;
    for s in stats.iter() {
        storage.store(Record::from(s));
    }
    let record = storage.aggregate();
    assert_eq!(record.get_scalar("accuracy_mean")?, 1.0);
    assert_eq!(record.get_scalar("correct_min")?, 6.0);
    assert_eq!(record.get_scalar("episode_max")?, 3.0);
    Ok(())
}

#[test]
fn test_default_evaluator() -> Result<()> {
    let env = env()?;
    let episode_len = env.max_step();
    let mut policy = OraclePolicy { t: 0, episode_len };
    let mut evaluator = DefaultEvaluator::from_env(env, 2);

    let record = evaluator.evaluate(&mut policy)?;
    assert_eq!(record.get_scalar("Episode return")?, episode_len as f32);
    assert_eq!(record.get_scalar("Episode length")?, episode_len as f32);
    Ok(())
}

#[test]
fn test_write_csv() -> Result<()> {
    let dir = TempDir::new("reco_eval")?;
    let path = dir.path().join("eval.csv");
    let stats = vec![EpisodeStats {
        episode: 1,
        steps: 6,
        steps_per_sec: 100.0,
        correct: 3,
        accuracy: 0.5,
    }];
    write_csv(&path, &stats)?;

    let mut rdr = csv::Reader::from_path(&path)?;
    let headers = rdr.headers()?.clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["episode", "steps", "steps_per_sec", "correct", "accuracy"]
    );
    let rows = rdr
        .deserialize::<EpisodeStats>()
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(rows, stats);
    Ok(())
}

#[test]
fn test_policy_from_yaml_file() -> Result<()> {
    let dir = TempDir::new("reco_policy")?;
    let path = dir.path().join("policy.yaml");
    std::fs::write(&path, "user_weight: 1.0\n")?;

    let mut policy = MeanRatingPolicy::build_from_path(&path)?;
    let mut obs = vec![0f32; 35];
    obs[0] = 0.4;
    obs[1] = 1.0;
    assert_eq!(policy.sample(&RecoObs::from(obs)), RecoAct::new(1));
    Ok(())
}

#[test]
fn test_policy_from_missing_file() {
    let dir = TempDir::new("reco_policy_missing").unwrap();
    let path = dir.path().join("missing.yaml");
    let err = MeanRatingPolicy::build_from_path(&path).err().unwrap();
    assert!(err.to_string().starts_with("Failed to open"));
}

#[test]
fn test_policy_from_malformed_file() -> Result<()> {
    let dir = TempDir::new("reco_policy_malformed")?;
    let path = dir.path().join("policy.yaml");
    std::fs::write(&path, "user_weight: [1, 2]\n")?;

    let err = MeanRatingPolicy::build_from_path(&path).err().unwrap();
    assert!(err.to_string().starts_with("Failed to parse policy config"));
    Ok(())
}
