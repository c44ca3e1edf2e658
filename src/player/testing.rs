//! Store double that counts calls and can be switched into a failing state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::StoreResult;
use crate::page::PageRequest;

use super::memory::MemoryStore;
use super::store::{PlayerStore, StoredPage};
use super::types::Player;

#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
  inner: MemoryStore,
  failing: AtomicBool,
  lookup_delay_ms: AtomicUsize,
  lookups: AtomicUsize,
  pages: AtomicUsize,
  saves: AtomicUsize,
}

impl FlakyStore {
  pub(crate) fn new(players: impl IntoIterator<Item = Player>) -> Self {
    Self {
      inner: MemoryStore::with_players(players),
      ..Self::default()
    }
  }

  pub(crate) fn fail(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  /// Make every `find_by_id` block the calling thread for `delay`.
  pub(crate) fn slow_lookups(&self, delay: Duration) {
    self
      .lookup_delay_ms
      .store(delay.as_millis() as usize, Ordering::SeqCst);
  }

  pub(crate) fn lookups(&self) -> usize {
    self.lookups.load(Ordering::SeqCst)
  }

  pub(crate) fn pages(&self) -> usize {
    self.pages.load(Ordering::SeqCst)
  }

  pub(crate) fn saves(&self) -> usize {
    self.saves.load(Ordering::SeqCst)
  }

  /// Write straight to the backing data, bypassing counters and failure mode.
  pub(crate) fn insert(&self, player: Player) {
    self.inner.save(&player).expect("memory save");
  }

  fn check(&self) -> StoreResult<()> {
    if self.failing.load(Ordering::SeqCst) {
      return Err("store unavailable".into());
    }
    Ok(())
  }
}

impl PlayerStore for FlakyStore {
  fn find_by_id(&self, player_id: &str) -> StoreResult<Option<Player>> {
    self.lookups.fetch_add(1, Ordering::SeqCst);
    let delay = self.lookup_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
      std::thread::sleep(Duration::from_millis(delay as u64));
    }
    self.check()?;
    self.inner.find_by_id(player_id)
  }

  fn find_all(&self) -> StoreResult<Vec<Player>> {
    self.check()?;
    self.inner.find_all()
  }

  fn find_page(&self, request: &PageRequest) -> StoreResult<StoredPage> {
    self.pages.fetch_add(1, Ordering::SeqCst);
    self.check()?;
    self.inner.find_page(request)
  }

  fn save(&self, player: &Player) -> StoreResult<Player> {
    self.saves.fetch_add(1, Ordering::SeqCst);
    self.check()?;
    self.inner.save(player)
  }
}
