//! In-memory record store.

use std::cmp::Ordering;
use std::sync::{PoisonError, RwLock};

use crate::error::StoreResult;
use crate::page::{PageRequest, SortDirection};

use super::store::{sort_field, PlayerStore, StoredPage};
use super::types::Player;

/// Store backed by a vector kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
  players: RwLock<Vec<Player>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a store seeded with `players`, preserving their order.
  pub fn with_players(players: impl IntoIterator<Item = Player>) -> Self {
    let store = Self::new();
    {
      let mut guard = store.players.write().unwrap_or_else(PoisonError::into_inner);
      for player in players {
        upsert(&mut guard, player);
      }
    }
    store
  }

  pub fn len(&self) -> usize {
    self.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.read().is_empty()
  }

  fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Player>> {
    self.players.read().unwrap_or_else(PoisonError::into_inner)
  }
}

fn upsert(players: &mut Vec<Player>, player: Player) {
  match players.iter_mut().find(|p| p.player_id == player.player_id) {
    Some(existing) => *existing = player,
    None => players.push(player),
  }
}

impl PlayerStore for MemoryStore {
  fn find_by_id(&self, player_id: &str) -> StoreResult<Option<Player>> {
    Ok(self.read().iter().find(|p| p.player_id == player_id).cloned())
  }

  fn find_all(&self) -> StoreResult<Vec<Player>> {
    Ok(self.read().clone())
  }

  fn find_page(&self, request: &PageRequest) -> StoreResult<StoredPage> {
    let field = sort_field(request.sort_field())?;
    let mut sorted = self.read().clone();

    sorted.sort_by(|a, b| {
      let ordering = field.value(a).cmp(&field.value(b));
      let ordering = match request.direction() {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
      };
      // Ties fall back to the identifier so pages never overlap
      match ordering {
        Ordering::Equal => a.player_id.cmp(&b.player_id),
        other => other,
      }
    });

    let total_elements = sorted.len() as u64;
    let players = sorted
      .into_iter()
      .skip(request.offset())
      .take(request.size())
      .collect();

    Ok(StoredPage {
      players,
      total_elements,
    })
  }

  fn save(&self, player: &Player) -> StoreResult<Player> {
    let mut guard = self.players.write().unwrap_or_else(PoisonError::into_inner);
    upsert(&mut guard, player.clone());
    Ok(player.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ids(players: &[Player]) -> Vec<&str> {
    players.iter().map(|p| p.player_id.as_str()).collect()
  }

  fn store() -> MemoryStore {
    MemoryStore::with_players([
      Player::new("B").with_name("Babe", "Ruth"),
      Player::new("A").with_name("Hank", "Aaron"),
      Player::new("C"),
    ])
  }

  #[test]
  fn test_find_all_keeps_insertion_order() {
    assert_eq!(ids(&store().find_all().unwrap()), vec!["B", "A", "C"]);
  }

  #[test]
  fn test_save_replaces_in_place() {
    let store = store();
    store.save(&Player::new("A").with_name("Henry", "Aaron")).unwrap();
    assert_eq!(store.len(), 3);
    let found = store.find_by_id("A").unwrap().unwrap();
    assert_eq!(found.first_name.as_deref(), Some("Henry"));
    assert_eq!(ids(&store.find_all().unwrap()), vec!["B", "A", "C"]);
  }

  #[test]
  fn test_page_sorted_by_id() {
    let request = PageRequest::new(0, 2, None, None).unwrap();
    let page = store().find_page(&request).unwrap();
    assert_eq!(ids(&page.players), vec!["A", "B"]);
    assert_eq!(page.total_elements, 3);
  }

  #[test]
  fn test_page_descending_by_last_name_nulls_last() {
    let request = PageRequest::new(0, 10, Some("lastName"), Some("desc")).unwrap();
    let page = store().find_page(&request).unwrap();
    assert_eq!(ids(&page.players), vec!["B", "A", "C"]);
  }

  #[test]
  fn test_page_past_end_is_empty() {
    let request = PageRequest::new(4, 2, None, None).unwrap();
    let page = store().find_page(&request).unwrap();
    assert!(page.players.is_empty());
    assert_eq!(page.total_elements, 3);
  }

  #[test]
  fn test_unknown_sort_field_is_an_error() {
    let request = PageRequest::new(0, 2, Some("salary"), None).unwrap();
    let err = store().find_page(&request).unwrap_err();
    assert!(err.to_string().contains("salary"));
  }
}
