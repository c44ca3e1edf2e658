//! Error types surfaced by the retrieval core.

/// Error produced by a [`PlayerStore`](crate::player::PlayerStore) adapter.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used by store adapters.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Sort direction was neither "asc" nor "desc".
  #[error("invalid sort direction '{0}', expected 'asc' or 'desc'")]
  InvalidSortDirection(String),

  /// The store failed while listing, paging or saving.
  #[error("failed to {operation}")]
  RetrievalFailure {
    operation: &'static str,
    #[source]
    source: StoreError,
  },

  /// A worker pool had no free thread and no queue slot left.
  #[error("{pool} pool is saturated ({capacity} tasks in flight)")]
  Overloaded { pool: String, capacity: usize },

  /// A submitted task panicked or was dropped when its pool shut down.
  #[error("{pool} pool task did not complete: {reason}")]
  Interrupted { pool: String, reason: String },

  #[error("failed to start {pool} pool")]
  PoolStartup {
    pool: String,
    #[source]
    source: std::io::Error,
  },
}

impl Error {
  pub(crate) fn retrieval(operation: &'static str, source: StoreError) -> Self {
    Self::RetrievalFailure { operation, source }
  }
}
