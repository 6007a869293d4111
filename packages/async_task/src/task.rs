//! Async task coordination without `async_trait`

use crate::resumable::{Resumable, Resume};
use crate::timeslice::DispatchBudget;

/// Error types for async task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),
    #[error("Task was cancelled")]
    Cancelled,
    #[error("Channel error: {0}")]
    Channel(String),
    #[error("Timeout error")]
    Timeout,
}

/// Result type for async tasks
pub type TaskResult<T> = Result<T, TaskError>;

/// Resumable job driven cooperatively on the tokio runtime.
///
/// Every dispatch gets a fresh [`DispatchBudget`]; when the job yields, the
/// task yields to the runtime before dispatching it again. Dropping the future
/// returned by any `execute*` method drops the job with it.
pub struct AsyncTask<R> {
    job: R,
}

impl<R> AsyncTask<R>
where
    R: Resumable + Send + 'static,
    R::Output: Send + 'static,
{
    /// Wrap a resumable job
    pub fn new(job: R) -> Self {
        Self { job }
    }

    /// Execute the task asynchronously
    ///
    /// # Errors
    ///
    /// Driving itself cannot fail; the `Result` keeps the signature uniform
    /// with the timeout and cancellation variants.
    pub async fn execute(self) -> TaskResult<R::Output> {
        Ok(self.drive().await.0)
    }

    /// Execute with timeout
    ///
    /// # Errors
    ///
    /// Returns `TaskError::Timeout` if the job has not completed within `duration`.
    pub async fn execute_with_timeout(self, duration: std::time::Duration) -> TaskResult<R::Output> {
        match tokio::time::timeout(duration, self.drive()).await {
            Ok((output, _)) => Ok(output),
            Err(_) => Err(TaskError::Timeout),
        }
    }

    /// Execute with cancellation support
    ///
    /// # Errors
    ///
    /// Returns `TaskError::Cancelled` if a value arrives on (or the sender of)
    /// `cancel_rx` before the job completes.
    pub async fn execute_with_cancellation(
        self,
        mut cancel_rx: tokio::sync::oneshot::Receiver<()>,
    ) -> TaskResult<R::Output> {
        tokio::select! {
            (output, _) = self.drive() => Ok(output),
            _ = &mut cancel_rx => Err(TaskError::Cancelled),
        }
    }

    /// Drive the job to completion, returning its output and the number of
    /// dispatches it took
    pub(crate) async fn drive(self) -> (R::Output, u64) {
        let mut job = self.job;
        let mut dispatches = 0u64;
        loop {
            dispatches += 1;
            let mut budget = DispatchBudget::new();
            match job.resume(&mut budget) {
                Resume::Yield(next) => {
                    job = next;
                    tokio::task::yield_now().await;
                }
                Resume::Complete(output) => return (output, dispatches),
            }
        }
    }
}

/// Builder for creating async tasks with configuration
pub struct AsyncTaskBuilder {
    timeout: Option<std::time::Duration>,
}

impl Default for AsyncTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncTaskBuilder {
    /// Builder with no timeout
    #[must_use]
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Fail with `TaskError::Timeout` if the job runs longer than `duration`
    #[must_use]
    pub fn with_timeout(mut self, duration: std::time::Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Run `job` with the configured options
    ///
    /// # Errors
    ///
    /// Returns `TaskError::Timeout` if a timeout was configured and elapsed.
    pub async fn run<R>(self, job: R) -> TaskResult<R::Output>
    where
        R: Resumable + Send + 'static,
        R::Output: Send + 'static,
    {
        let task = AsyncTask::new(job);
        match self.timeout {
            Some(duration) => task.execute_with_timeout(duration).await,
            None => task.execute().await,
        }
    }
}
