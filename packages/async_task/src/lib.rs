//! # Async Task Coordination Library
//!
//! Cooperative driving of long, CPU-bound jobs without `async_trait` or blocking
//! threads. A job implements [`Resumable`]: it does a bounded burst of work per
//! dispatch, reports how much of the dispatch quantum it used through a
//! [`Timeslice`], and hands itself back when asked to yield. [`AsyncTask`] and
//! [`AsyncExecutor`] drive such jobs on tokio, yielding to the runtime between
//! dispatches.

pub mod executor;
pub mod resumable;
pub mod task;
pub mod timeslice;

pub use executor::{AsyncExecutor, ExecutorConfig, ExecutorMetrics};
pub use resumable::{Resumable, Resume};
pub use task::{AsyncTask, AsyncTaskBuilder, TaskError, TaskResult};
pub use timeslice::{DispatchBudget, Timeslice, Unbounded};

/// Re-export common types
pub type Result<T> = std::result::Result<T, TaskError>;
