use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Why a stage did not produce a value.
#[derive(Debug)]
pub enum StageError {
    /// The pool was shut down while the stage waited for a worker.
    Closed,
    Panicked(String),
}

/// Cheap handle used by jobs to run their stages on a pool worker.
#[derive(Clone)]
pub struct Workers {
    permits: Arc<Semaphore>,
}

impl Workers {
    /// Run one stage while holding a worker permit. Stages queue in FIFO
    /// order when every worker is busy.
    pub async fn run<F>(&self, stage: F) -> Result<F::Output, StageError>
    where
        F: Future,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| StageError::Closed)?;

        AssertUnwindSafe(stage)
            .catch_unwind()
            .await
            .map_err(|payload| StageError::Panicked(panic_message(payload.as_ref())))
    }
}

/// Fixed-size pool: `size` stages run at once, across all jobs.
pub struct WorkerPool {
    size: usize,
    permits: Arc<Semaphore>,
    jobs: JoinSet<()>,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            permits: Arc::new(Semaphore::new(size)),
            jobs: JoinSet::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn workers(&self) -> Workers {
        Workers {
            permits: Arc::clone(&self.permits),
        }
    }

    /// Track a job. Must be called from within a tokio runtime.
    pub fn spawn<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.reap();
        self.jobs.spawn(job);
    }

    /// Jobs spawned and not yet finished.
    pub fn in_flight(&mut self) -> usize {
        self.reap();
        self.jobs.len()
    }

    fn reap(&mut self) {
        while let Some(result) = self.jobs.try_join_next() {
            if let Err(e) = result {
                if e.is_panic() {
                    tracing::error!("pipeline job panicked outside a stage: {}", e);
                }
            }
        }
    }

    /// Give running jobs `grace` to finish, then cancel whatever is left.
    /// Returns the number of jobs cancelled.
    pub async fn shutdown(&mut self, grace: Duration) -> usize {
        let drained = tokio::time::timeout(grace, async {
            while self.jobs.join_next().await.is_some() {}
        })
        .await;

        let cancelled = if drained.is_ok() { 0 } else { self.jobs.len() };
        self.permits.close();
        self.jobs.abort_all();
        while self.jobs.join_next().await.is_some() {}

        if cancelled > 0 {
            tracing::info!(cancelled, "cancelled unfinished pipeline jobs");
        }
        cancelled
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
