//! Driving resumable jobs through tasks and the executor

use async_task::{
    AsyncExecutor, AsyncTask, AsyncTaskBuilder, ExecutorConfig, Resumable, Resume, TaskError,
    Timeslice,
};
use std::time::Duration;

/// Yields once per dispatch until `remaining` dispatches have run
struct Spin {
    remaining: u64,
}

impl Resumable for Spin {
    type Output = u64;

    fn resume<T: Timeslice>(mut self, slice: &mut T) -> Resume<Self, u64> {
        if self.remaining == 0 {
            return Resume::Complete(0);
        }
        self.remaining -= 1;
        if slice.consume(100) {
            Resume::Yield(self)
        } else {
            Resume::Complete(self.remaining)
        }
    }
}

#[tokio::test]
async fn test_execute_yields_between_dispatches() {
    let output = AsyncTask::new(Spin { remaining: 5 })
        .execute()
        .await
        .expect("completes");
    assert_eq!(output, 0);
}

#[tokio::test]
async fn test_executor_metrics_count_dispatches() {
    let executor = AsyncExecutor::new(ExecutorConfig {
        enable_metrics: true,
        ..ExecutorConfig::default()
    });
    let tasks = vec![
        AsyncTask::new(Spin { remaining: 3 }),
        AsyncTask::new(Spin { remaining: 7 }),
    ];
    let results = executor.execute_batch(tasks).await;
    assert!(results.iter().all(Result::is_ok));

    let metrics = executor.metrics().await;
    assert_eq!(metrics.tasks_executed, 2);
    assert_eq!(metrics.tasks_failed, 0);
    // Each job yields `remaining` times, then completes on one more dispatch
    assert_eq!(metrics.total_dispatches, 4 + 8);
}

#[tokio::test]
async fn test_executor_timeout_is_counted_as_failure() {
    let executor = AsyncExecutor::new(ExecutorConfig {
        task_timeout: Some(Duration::from_millis(10)),
        enable_metrics: true,
        ..ExecutorConfig::default()
    });
    let result = executor
        .execute_task(AsyncTask::new(Spin {
            remaining: u64::MAX,
        }))
        .await;
    assert_eq!(result, Err(TaskError::Timeout));
    assert_eq!(executor.metrics().await.tasks_failed, 1);
}

#[tokio::test]
async fn test_cancellation() {
    let (tx, rx) = tokio::sync::oneshot::channel();
    tx.send(()).expect("receiver alive");
    let result = AsyncTask::new(Spin {
        remaining: u64::MAX,
    })
    .execute_with_cancellation(rx)
    .await;
    assert_eq!(result, Err(TaskError::Cancelled));
}

#[tokio::test]
async fn test_builder_timeout() {
    let result = AsyncTaskBuilder::new()
        .with_timeout(Duration::from_millis(10))
        .run(Spin {
            remaining: u64::MAX,
        })
        .await;
    assert_eq!(result, Err(TaskError::Timeout));

    let result = AsyncTaskBuilder::new().run(Spin { remaining: 2 }).await;
    assert_eq!(result, Ok(0));
}

#[test]
fn test_executor_config_deserialize() {
    let config: ExecutorConfig =
        serde_json::from_str(r#"{"max_concurrent_tasks": 4}"#).expect("valid config");
    assert_eq!(config.max_concurrent_tasks, 4);
    assert_eq!(config.task_timeout, None);
    assert!(!config.enable_metrics);

    let config: ExecutorConfig = serde_json::from_str(
        r#"{"task_timeout": {"secs": 2, "nanos": 0}, "enable_metrics": true}"#,
    )
    .expect("valid config");
    assert_eq!(config.task_timeout, Some(Duration::from_secs(2)));
    assert_eq!(config.max_concurrent_tasks, 100);
}
