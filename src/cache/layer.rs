//! Cache layer that memoizes single-player lookups in front of the store.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::player::{Player, PlayerStore};

use super::stats::{CacheStats, StatsSnapshot};

/// Memo from player id to the last fetched result.
///
/// Both "found" and "confirmed absent" outcomes are memoized. A store failure is
/// not: the caller sees `None` and the next lookup goes back to the store.
/// Entries never expire.
pub struct PlayerCache<S: PlayerStore> {
  store: Arc<S>,
  entries: DashMap<String, Option<Player>>,
  /// Simulated latency added to every store fetch
  fetch_delay: Duration,
  stats: CacheStats,
}

impl<S: PlayerStore> PlayerCache<S> {
  /// Create a new cache in front of `store`.
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      entries: DashMap::new(),
      fetch_delay: Duration::ZERO,
      stats: CacheStats::default(),
    }
  }

  /// Set the simulated latency for store fetches.
  pub fn with_fetch_delay(mut self, fetch_delay: Duration) -> Self {
    self.fetch_delay = fetch_delay;
    self
  }

  /// Look up a player, hitting the store only on a miss.
  pub fn get(&self, player_id: &str) -> Option<Player> {
    if let Some(cached) = self.cached(player_id) {
      self.stats.hit();
      debug!(player_id, found = cached.is_some(), "player cache hit");
      return cached;
    }

    self.stats.miss();
    info!(player_id, "fetching player from store");

    match self.store.find_by_id(player_id) {
      Ok(found) => {
        if !self.fetch_delay.is_zero() {
          std::thread::sleep(self.fetch_delay);
        }
        // First writer wins if two callers raced on the same miss
        self
          .entries
          .entry(player_id.to_string())
          .or_insert(found)
          .value()
          .clone()
      }
      Err(e) => {
        self.stats.failure();
        warn!(player_id, "exception in player lookup: {}", e);
        None
      }
    }
  }

  /// Replace the memoized entry for a player that was just written.
  pub fn refresh(&self, player: &Player) {
    self
      .entries
      .insert(player.player_id.clone(), Some(player.clone()));
  }

  /// Whether a lookup for `player_id` would be answered from memory.
  pub fn contains(&self, player_id: &str) -> bool {
    self.entries.contains_key(player_id)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn stats(&self) -> StatsSnapshot {
    self.stats.snapshot()
  }

  fn cached(&self, player_id: &str) -> Option<Option<Player>> {
    self.entries.get(player_id).map(|entry| entry.value().clone())
  }
}
