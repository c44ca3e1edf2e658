//! Bounded worker pools.
//!
//! Each pool owns a dedicated tokio runtime. Tasks run on its blocking threads,
//! capped at `max_threads`, with idle threads reaped after `keep_alive_secs`.
//! Admission is bounded by a semaphore sized `max_threads + queue_capacity`; once
//! every permit is taken further submissions are rejected instead of queued.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::error::{Error, Result};

use super::handle::TaskHandle;

/// Sizing for one worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolConfig {
  /// Prefix for worker thread names, e.g. "Player-"
  pub name_prefix: String,
  /// Runtime worker threads. These drive timers and handle polling only; tasks
  /// never run on them, so none of them count towards `max_threads`.
  pub core_threads: usize,
  /// Blocking threads that run tasks. Idle ones are reaped after
  /// `keep_alive_secs`, down to zero.
  pub max_threads: usize,
  /// Tasks allowed to wait once every thread is busy
  pub queue_capacity: usize,
  pub keep_alive_secs: u64,
}

impl PoolConfig {
  pub fn new(
    name_prefix: impl Into<String>,
    core_threads: usize,
    max_threads: usize,
    queue_capacity: usize,
    keep_alive_secs: u64,
  ) -> Self {
    Self {
      name_prefix: name_prefix.into(),
      core_threads,
      max_threads,
      queue_capacity,
      keep_alive_secs,
    }
  }

  /// Pool for list-all, single lookups and saves.
  pub fn record() -> Self {
    Self::new("Player-", 5, 20, 100, 60)
  }

  /// Pool for paginated listings.
  pub fn pagination() -> Self {
    Self::new("Paginated-", 3, 10, 50, 30)
  }

  fn max_threads(&self) -> usize {
    self.max_threads.max(1)
  }

  fn core_threads(&self) -> usize {
    self.core_threads.clamp(1, self.max_threads())
  }

  /// Tasks the pool accepts before rejecting: running plus queued.
  pub fn capacity(&self) -> usize {
    self.max_threads() + self.queue_capacity
  }
}

/// Both pools used by the dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolsConfig {
  #[serde(default = "PoolConfig::record")]
  pub record: PoolConfig,
  #[serde(default = "PoolConfig::pagination")]
  pub pagination: PoolConfig,
}

impl Default for PoolsConfig {
  fn default() -> Self {
    Self {
      record: PoolConfig::record(),
      pagination: PoolConfig::pagination(),
    }
  }
}

/// A bounded pool of worker threads.
pub struct WorkerPool {
  name: String,
  runtime: Option<Runtime>,
  permits: Arc<Semaphore>,
  capacity: usize,
}

impl WorkerPool {
  pub fn new(name: impl Into<String>, config: &PoolConfig) -> Result<Self> {
    let name = name.into();
    let prefix = config.name_prefix.clone();
    let next_id = Arc::new(AtomicUsize::new(1));

    let runtime = Builder::new_multi_thread()
      .worker_threads(config.core_threads())
      .max_blocking_threads(config.max_threads())
      .thread_keep_alive(Duration::from_secs(config.keep_alive_secs.max(1)))
      .thread_name_fn(move || format!("{}{}", prefix, next_id.fetch_add(1, Ordering::Relaxed)))
      .enable_all()
      .build()
      .map_err(|source| Error::PoolStartup {
        pool: name.clone(),
        source,
      })?;

    let capacity = config.capacity();
    debug!(pool = %name, capacity, "worker pool started");

    Ok(Self {
      name,
      runtime: Some(runtime),
      permits: Arc::new(Semaphore::new(capacity)),
      capacity,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Tasks currently running or waiting for a thread.
  pub fn in_flight(&self) -> usize {
    self.capacity - self.permits.available_permits()
  }

  /// Run `task` on a pool thread. Never blocks: a saturated pool yields a handle
  /// that resolves to [`Error::Overloaded`].
  pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
  where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
  {
    let Some(runtime) = self.runtime.as_ref() else {
      return TaskHandle::failed(&self.name, self.interrupted("pool is shut down"));
    };

    let permit = match Arc::clone(&self.permits).try_acquire_owned() {
      Ok(permit) => permit,
      Err(_) => {
        error!(pool = %self.name, capacity = self.capacity, "rejecting task, pool saturated");
        return TaskHandle::failed(
          &self.name,
          Error::Overloaded {
            pool: self.name.clone(),
            capacity: self.capacity,
          },
        );
      }
    };

    let handle = runtime.spawn_blocking(move || {
      let _permit = permit;
      task()
    });
    TaskHandle::spawned(self.name.clone(), handle)
  }

  fn interrupted(&self, reason: &str) -> Error {
    Error::Interrupted {
      pool: self.name.clone(),
      reason: reason.to_string(),
    }
  }
}

impl Drop for WorkerPool {
  fn drop(&mut self) {
    // Blocking shutdown would panic when dropped from inside another runtime
    if let Some(runtime) = self.runtime.take() {
      runtime.shutdown_background();
    }
  }
}
