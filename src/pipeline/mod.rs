//! Translate-then-score pipeline.
//!
//! Every submission becomes one job on the [`WorkerPool`]. The job runs two
//! stages, each holding a worker only while it executes, and reports back to
//! the UI thread over a channel: `Translated` after the first stage, then
//! exactly one of `Resolved` or `Failed`.

pub mod pool;

use crate::error::{PipelineError, TranslateError};
use crate::sentiment::{PolarityScores, SentimentLabel, SentimentScorer};
use crate::translate::{Translation, Translator};
use pool::{StageError, WorkerPool, Workers};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// User text that is known to be non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputText(String);

impl InputText {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub input: String,
    pub translation: Translation,
    pub scores: PolarityScores,
    pub label: SentimentLabel,
}

#[derive(Debug)]
pub struct PipelineMessage {
    pub submission: SubmissionId,
    pub event: PipelineEvent,
}

#[derive(Debug)]
pub enum PipelineEvent {
    Translated(Translation),
    Resolved(Analysis),
    Failed(PipelineError),
}

impl PipelineEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineEvent::Translated(_))
    }
}

pub struct Pipeline {
    translator: Arc<dyn Translator>,
    scorer: Arc<dyn SentimentScorer>,
    pool: WorkerPool,
    tx: mpsc::UnboundedSender<PipelineMessage>,
    next_id: u64,
}

impl Pipeline {
    pub fn new(
        translator: Arc<dyn Translator>,
        scorer: Arc<dyn SentimentScorer>,
        workers: usize,
    ) -> (Self, mpsc::UnboundedReceiver<PipelineMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let pipeline = Self {
            translator,
            scorer,
            pool: WorkerPool::new(workers),
            tx,
            next_id: 0,
        };
        (pipeline, rx)
    }

    pub fn workers(&self) -> usize {
        self.pool.size()
    }

    pub fn translator_name(&self) -> &str {
        self.translator.name()
    }

    /// Queue an analysis. Must be called from within a tokio runtime.
    pub fn submit(&mut self, input: InputText) -> SubmissionId {
        self.next_id += 1;
        let id = SubmissionId(self.next_id);

        let translator = Arc::clone(&self.translator);
        let scorer = Arc::clone(&self.scorer);
        let workers = self.pool.workers();
        let tx = self.tx.clone();

        tracing::info!(submission = %id, chars = input.as_str().len(), "submitted");
        self.pool.spawn(async move {
            let started = Instant::now();
            let event = match run_stages(id, input, translator, scorer, workers, &tx).await {
                Ok(analysis) => {
                    tracing::info!(
                        submission = %id,
                        label = %analysis.label,
                        compound = analysis.scores.compound,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "resolved"
                    );
                    PipelineEvent::Resolved(analysis)
                }
                Err(e) => {
                    tracing::warn!(submission = %id, "pipeline failed: {}", e);
                    PipelineEvent::Failed(e)
                }
            };
            // The receiver is gone only when the UI is shutting down
            let _ = tx.send(PipelineMessage {
                submission: id,
                event,
            });
        });

        id
    }

    pub fn in_flight(&mut self) -> usize {
        self.pool.in_flight()
    }

    pub async fn shutdown(&mut self, grace: Duration) -> usize {
        self.pool.shutdown(grace).await
    }
}

async fn run_stages(
    id: SubmissionId,
    input: InputText,
    translator: Arc<dyn Translator>,
    scorer: Arc<dyn SentimentScorer>,
    workers: Workers,
    tx: &mpsc::UnboundedSender<PipelineMessage>,
) -> Result<Analysis, PipelineError> {
    let translation = workers
        .run(translator.translate(input.as_str()))
        .await
        .map_err(|e| match e {
            StageError::Closed => PipelineError::Shutdown,
            StageError::Panicked(message) => {
                PipelineError::Translation(TranslateError::Crashed(message))
            }
        })??;

    tracing::debug!(submission = %id, "translated");
    let _ = tx.send(PipelineMessage {
        submission: id,
        event: PipelineEvent::Translated(translation.clone()),
    });

    let english = translation.text.clone();
    let scores = workers
        .run(tokio::task::spawn_blocking(move || {
            scorer.polarity_scores(&english)
        }))
        .await
        .map_err(|e| match e {
            StageError::Closed => PipelineError::Shutdown,
            StageError::Panicked(message) => PipelineError::Analysis(message),
        })?
        .map_err(|e| {
            if e.is_panic() {
                PipelineError::Analysis(format!(
                    "sentiment scorer crashed: {}",
                    pool::panic_message(e.into_panic().as_ref())
                ))
            } else {
                PipelineError::Analysis(e.to_string())
            }
        })?;

    Ok(Analysis {
        input: input.as_str().to_string(),
        translation,
        label: scores.label(),
        scores,
    })
}
