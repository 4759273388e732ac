//! Episode evaluation loop.
use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use reco_core::{
    record::{
        AggregateRecorder, Record,
        RecordValue::{DateTime, Scalar},
    },
    Env, Policy,
};
use reco_env::{RecoEnv, RenderMode};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fs::File, path::Path, time::Instant};

/// Statistics of a finished episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// One-based episode number.
    pub episode: usize,

    /// The number of steps in the episode.
    pub steps: usize,

    pub steps_per_sec: f32,

    /// The number of exact predictions.
    pub correct: usize,

    /// `correct / steps`.
    pub accuracy: f32,
}

impl From<&EpisodeStats> for Record {
    fn from(stats: &EpisodeStats) -> Self {
        Record::from_slice(&[
            ("episode", Scalar(stats.episode as _)),
            ("steps", Scalar(stats.steps as _)),
            ("steps_per_sec", Scalar(stats.steps_per_sec)),
            ("correct", Scalar(stats.correct as _)),
            ("accuracy", Scalar(stats.accuracy)),
        ])
    }
}

impl TryFrom<&Record> for EpisodeStats {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            episode: record.get_scalar("episode")? as _,
            steps: record.get_scalar("steps")? as _,
            steps_per_sec: record.get_scalar("steps_per_sec")?,
            correct: record.get_scalar("correct")? as _,
            accuracy: record.get_scalar("accuracy")?,
        })
    }
}

/// Configuration of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// The total number of steps, possibly spanning several episodes.
    pub n_steps: usize,

    /// If given, the environment is rendered every `render_interval` steps.
    #[serde(default)]
    pub render_interval: Option<usize>,

    #[serde(default = "default_render_mode")]
    pub render_mode: RenderMode,
}

fn default_render_mode() -> RenderMode {
    RenderMode::Logger
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            n_steps: 1000,
            render_interval: None,
            render_mode: default_render_mode(),
        }
    }
}

impl EvalConfig {
    /// Sets the number of steps.
    pub fn n_steps(mut self, v: usize) -> Self {
        self.n_steps = v;
        self
    }

    /// Sets the interval of rendering.
    pub fn render_interval(mut self, v: Option<usize>) -> Self {
        self.render_interval = v;
        self
    }
}

/// Runs `policy` on `env` for `config.n_steps` steps.
///
/// Every time an episode ends, its statistics are logged, stored to `recorder` together
/// with the local time under `"finished_at"`, and the environment is reset. Steps of an
/// unfinished last episode are not reported.
/// `recorder` is flushed with the total number of steps at the end.
pub fn evaluate<P, R>(
    policy: &mut P,
    env: &mut RecoEnv,
    config: &EvalConfig,
    recorder: &mut R,
) -> Result<Vec<EpisodeStats>>
where
    P: Policy<RecoEnv>,
    R: AggregateRecorder,
{
    let mut stats = Vec::new();
    let mut obs = env.reset()?;
    let mut start_time = Instant::now();
    let mut step_count = 0;
    let mut episode = 1;

    for i in 0..config.n_steps {
        step_count += 1;
        let act = policy.sample(&obs);
        let (step, _) = env.step(&act)?;

        if let Some(interval) = config.render_interval {
            if interval > 0 && (i + 1) % interval == 0 {
                env.render(config.render_mode);
            }
        }

        if step.is_done() {
            let elapsed = start_time.elapsed().as_secs_f32();
            let correct = env.total_correct_predictions();
            let s = EpisodeStats {
                episode,
                steps: step_count,
                steps_per_sec: step_count as f32 / elapsed.max(1e-6),
                correct,
                accuracy: correct as f32 / step_count as f32,
            };
            info!(
                "Episode #{}: total steps = {}, steps/second = {:.1}, total correct predictions = {}, prediction accuracy = {:.4}",
                s.episode, s.steps, s.steps_per_sec, s.correct, s.accuracy
            );
            let mut record = Record::from(&s);
            record.insert("finished_at", DateTime(Local::now()));
            recorder.store(record);
            stats.push(s);

            obs = env.reset()?;
            step_count = 0;
            episode += 1;
            start_time = Instant::now();
        } else {
            obs = step.obs;
        }
    }

    recorder.flush(config.n_steps as i64);
    Ok(stats)
}

/// Writes episode statistics as a CSV file with a header row.
pub fn write_csv(path: impl AsRef<Path>, stats: &[EpisodeStats]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut wtr = csv::Writer::from_writer(file);
    for s in stats {
        wtr.serialize(s)?;
    }
    wtr.flush()?;
    Ok(())
}
