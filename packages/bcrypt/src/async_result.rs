//! Async bcrypt result type implementing the unwrapping pattern

use crate::{BcryptError, BcryptHash, Result};
use async_task::TaskError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Concrete async bcrypt resolution result
pub struct AsyncBcryptResult<T = BcryptHash> {
    receiver: oneshot::Receiver<Result<T>>,
}

/// Async bcrypt result with user-defined result handler
pub struct AsyncBcryptResultWithHandler<T, F> {
    receiver: oneshot::Receiver<Result<T>>,
    handler: Option<F>,
}

impl<T> AsyncBcryptResult<T> {
    /// Create a new `AsyncBcryptResult` from a oneshot receiver
    pub(crate) fn new(receiver: oneshot::Receiver<Result<T>>) -> Self {
        Self { receiver }
    }

    /// Create an `AsyncBcryptResult` that's already completed
    #[must_use]
    pub fn ready(result: Result<T>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }

    /// Create an `AsyncBcryptResult` that yields an error
    #[must_use]
    pub fn error(error: BcryptError) -> Self {
        Self::ready(Err(error))
    }

    /// Add a result handler that receives the `Result` and returns a plain value
    pub fn on_result<F, U>(self, handler: F) -> AsyncBcryptResultWithHandler<T, F>
    where
        F: FnOnce(Result<T>) -> U,
    {
        AsyncBcryptResultWithHandler {
            receiver: self.receiver,
            handler: Some(handler),
        }
    }
}

fn dropped() -> BcryptError {
    BcryptError::Task(TaskError::Channel("bcrypt task dropped".to_string()))
}

impl<T> Future for AsyncBcryptResult<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(dropped())),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, F, U> Future for AsyncBcryptResultWithHandler<T, F>
where
    F: FnOnce(Result<T>) -> U + Unpin,
{
    type Output = U;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let result = match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => result,
            Poll::Ready(Err(_)) => Err(dropped()),
            Poll::Pending => return Poll::Pending,
        };
        match this.handler.take() {
            Some(handler) => Poll::Ready(handler(result)),
            // Already completed
            None => Poll::Pending,
        }
    }
}
