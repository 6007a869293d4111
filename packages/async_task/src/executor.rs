//! Async executor patterns without blocking operations

use crate::{AsyncTask, Resumable, TaskError, TaskResult};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, Semaphore};

/// Configuration for async executor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub max_concurrent_tasks: usize,
    pub task_timeout: Option<Duration>,
    pub enable_metrics: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: 100,
            task_timeout: None,
            enable_metrics: false,
        }
    }
}

/// Async executor that interleaves resumable jobs without blocking
pub struct AsyncExecutor {
    config: ExecutorConfig,
    semaphore: Arc<Semaphore>,
    metrics: Arc<RwLock<ExecutorMetrics>>,
}

/// Metrics for executor performance
#[derive(Debug, Default, Clone)]
pub struct ExecutorMetrics {
    pub tasks_executed: u64,
    pub tasks_failed: u64,
    pub tasks_cancelled: u64,
    /// Dispatches across all completed tasks
    pub total_dispatches: u64,
    pub average_execution_time: Duration,
}

impl AsyncExecutor {
    /// Create new async executor
    #[must_use]
    pub fn new(config: ExecutorConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_tasks));

        Self {
            semaphore,
            config,
            metrics: Arc::new(RwLock::new(ExecutorMetrics::default())),
        }
    }

    /// Configuration this executor was built with
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute a single task
    ///
    /// # Errors
    ///
    /// Returns `TaskError::Cancelled` if the executor's semaphore has been closed,
    /// or `TaskError::Timeout` if the task exceeds the configured timeout.
    pub async fn execute_task<R>(&self, task: AsyncTask<R>) -> TaskResult<R::Output>
    where
        R: Resumable + Send + 'static,
        R::Output: Send + 'static,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TaskError::Cancelled)?;

        let start_time = std::time::Instant::now();
        let result = if let Some(timeout) = self.config.task_timeout {
            tokio::time::timeout(timeout, task.drive())
                .await
                .map_err(|_| TaskError::Timeout)
        } else {
            Ok(task.drive().await)
        };

        if let Err(ref e) = result {
            tracing::warn!(error = %e, "resumable task did not complete");
        }

        if self.config.enable_metrics {
            self.update_metrics(&result, start_time.elapsed()).await;
        }

        result.map(|(output, _)| output)
    }

    /// Execute multiple tasks concurrently
    pub async fn execute_batch<R>(&self, tasks: Vec<AsyncTask<R>>) -> Vec<TaskResult<R::Output>>
    where
        R: Resumable + Send + 'static,
        R::Output: Send + 'static,
    {
        let futures = tasks.into_iter().map(|task| self.execute_task(task));
        futures::future::join_all(futures).await
    }

    /// Get current metrics
    pub async fn metrics(&self) -> ExecutorMetrics {
        self.metrics.read().await.clone()
    }

    /// Stop admitting new tasks; tasks already running finish normally
    pub fn close(&self) {
        self.semaphore.close();
    }

    async fn update_metrics<T>(&self, result: &TaskResult<(T, u64)>, duration: Duration) {
        let mut metrics = self.metrics.write().await;

        match result {
            Ok((_, dispatches)) => {
                metrics.tasks_executed += 1;
                metrics.total_dispatches += dispatches;
            }
            Err(TaskError::Cancelled) => metrics.tasks_cancelled += 1,
            Err(_) => metrics.tasks_failed += 1,
        }

        // Simple moving average
        let total_tasks = metrics.tasks_executed + metrics.tasks_failed + metrics.tasks_cancelled;
        if total_tasks > 0 {
            let total_nanos = metrics.average_execution_time.as_nanos()
                * u128::from(total_tasks - 1)
                + duration.as_nanos();
            metrics.average_execution_time = Duration::from_nanos(
                u64::try_from(total_nanos / u128::from(total_tasks)).unwrap_or(u64::MAX),
            );
        }
    }
}
