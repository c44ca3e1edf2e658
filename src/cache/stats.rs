use std::sync::atomic::{AtomicU64, Ordering};

/// Lookup counters for a [`PlayerCache`](super::PlayerCache).
#[derive(Debug, Default)]
pub(crate) struct CacheStats {
  hits: AtomicU64,
  misses: AtomicU64,
  failures: AtomicU64,
}

impl CacheStats {
  pub(crate) fn hit(&self) {
    self.hits.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn miss(&self) {
    self.misses.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn failure(&self) {
    self.failures.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn snapshot(&self) -> StatsSnapshot {
    StatsSnapshot {
      hits: self.hits.load(Ordering::Relaxed),
      misses: self.misses.load(Ordering::Relaxed),
      failures: self.failures.load(Ordering::Relaxed),
    }
  }
}

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
  pub hits: u64,
  pub misses: u64,
  /// Misses whose store fetch failed
  pub failures: u64,
}
