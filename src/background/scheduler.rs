use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{Result, SchedulerError};

use super::{Job, JobOutcome};

/// Lifecycle of the background worker slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No job in flight; a job can be started.
    ReadyToStart,
    /// A job is running.
    Processing,
    /// A job has finished and must be joined before the next one starts.
    WaitingForJoin,
}

#[derive(Debug)]
struct Worker {
    thread: JoinHandle<Result<JobOutcome>>,
    cancel: Arc<AtomicBool>,
}

/// Runs at most one [`Job`] at a time on a worker thread.
///
/// The host polls [`BackgroundScheduler::state`] and collects the outcome
/// with [`BackgroundScheduler::join`] on its own thread. Dropping the
/// scheduler aborts the job in flight.
#[derive(Debug, Default)]
pub struct BackgroundScheduler {
    worker: Option<Worker>,
}

impl BackgroundScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        match &self.worker {
            None => SchedulerState::ReadyToStart,
            Some(worker) if worker.thread.is_finished() => SchedulerState::WaitingForJoin,
            Some(_) => SchedulerState::Processing,
        }
    }

    /// Starts `job` on a new worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Busy`] if a job is running or waiting to be
    /// joined, or [`SchedulerError::Spawn`] if the thread cannot be created.
    pub fn start_job(&mut self, job: Job) -> Result<()> {
        if self.worker.is_some() {
            return Err(SchedulerError::Busy.into());
        }
        let kind = job.kind();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let thread = thread::Builder::new()
            .name(format!("navsurf-{kind}"))
            .spawn(move || job.execute(&flag))
            .map_err(SchedulerError::Spawn)?;
        tracing::debug!(job = kind, "background job started");
        self.worker = Some(Worker { thread, cancel });
        Ok(())
    }

    /// Collects the outcome of the finished job.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NothingToJoin`] if no job was started,
    /// [`SchedulerError::NotFinished`] if it is still running,
    /// [`SchedulerError::WorkerPanicked`] if it panicked, or the job's own
    /// error.
    pub fn join(&mut self) -> Result<JobOutcome> {
        let Some(worker) = self.worker.take() else {
            return Err(SchedulerError::NothingToJoin.into());
        };
        if !worker.thread.is_finished() {
            self.worker = Some(worker);
            return Err(SchedulerError::NotFinished.into());
        }
        let outcome = worker
            .thread
            .join()
            .map_err(|_| SchedulerError::WorkerPanicked)?;
        tracing::debug!("background job joined");
        outcome
    }

    /// Asks the job in flight to stop and forgets it. The worker stops at
    /// its next cancellation check; its outcome is discarded.
    pub fn abort(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel.store(true, Ordering::Release);
            tracing::debug!("background job aborted");
        }
    }
}

impl Drop for BackgroundScheduler {
    fn drop(&mut self) {
        self.abort();
    }
}
