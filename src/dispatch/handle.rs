use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Completion handle for work submitted to a [`WorkerPool`](super::WorkerPool).
///
/// Resolves to the task's value or error. There is no cancellation: dropping the
/// handle discards the result but the task still runs to completion. Await it from
/// async code or call [`TaskHandle::wait`] from a plain thread.
#[must_use = "a TaskHandle does nothing unless awaited or waited on"]
pub struct TaskHandle<T> {
  pool: String,
  state: State<T>,
}

enum State<T> {
  Failed(Option<Error>),
  Running(JoinHandle<Result<T>>),
}

impl<T> TaskHandle<T> {
  pub(crate) fn spawned(pool: String, handle: JoinHandle<Result<T>>) -> Self {
    Self {
      pool,
      state: State::Running(handle),
    }
  }

  /// A handle that is already complete with `error`.
  pub(crate) fn failed(pool: &str, error: Error) -> Self {
    Self {
      pool: pool.to_string(),
      state: State::Failed(Some(error)),
    }
  }

  /// Name of the pool the work was submitted to.
  pub fn pool(&self) -> &str {
    &self.pool
  }

  /// Block the current thread until the task completes.
  pub fn wait(self) -> Result<T> {
    futures::executor::block_on(self)
  }
}

impl<T> Future for TaskHandle<T> {
  type Output = Result<T>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();
    match &mut this.state {
      State::Failed(error) => Poll::Ready(Err(error.take().unwrap_or_else(|| Error::Interrupted {
        pool: this.pool.clone(),
        reason: "handle polled after completion".to_string(),
      }))),
      State::Running(handle) => Pin::new(handle).poll(cx).map(|joined| match joined {
        Ok(result) => result,
        Err(e) => Err(Error::Interrupted {
          pool: this.pool.clone(),
          reason: e.to_string(),
        }),
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_failed_handle_resolves_immediately() {
    let handle: TaskHandle<()> = TaskHandle::failed(
      "pagination",
      Error::Overloaded {
        pool: "pagination".to_string(),
        capacity: 60,
      },
    );
    assert_eq!(handle.pool(), "pagination");
    assert!(matches!(handle.wait(), Err(Error::Overloaded { capacity: 60, .. })));
  }

  #[tokio::test]
  async fn test_failed_handle_can_be_awaited() {
    let handle: TaskHandle<u8> = TaskHandle::failed("record", Error::InvalidSortDirection("up".into()));
    assert!(matches!(handle.await, Err(Error::InvalidSortDirection(_))));
  }
}
