//! Record store contract consumed by the retrieval core.

use crate::error::StoreResult;
use crate::page::PageRequest;

use super::types::{Player, PlayerField};

/// One slice of the catalog as returned by a store's paged query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredPage {
  /// Players on the requested page, already sorted
  pub players: Vec<Player>,
  /// Number of players across all pages
  pub total_elements: u64,
}

/// Trait for record store backends.
///
/// The store is the single source of truth; everything above it (cache, pagination)
/// only reads through these four operations.
pub trait PlayerStore: Send + Sync + 'static {
  /// Look up one player by identifier.
  fn find_by_id(&self, player_id: &str) -> StoreResult<Option<Player>>;

  /// All players in store iteration order.
  fn find_all(&self) -> StoreResult<Vec<Player>>;

  /// One sorted page. `request` is already normalized by the pagination engine.
  fn find_page(&self, request: &PageRequest) -> StoreResult<StoredPage>;

  /// Insert or replace a player by identifier.
  fn save(&self, player: &Player) -> StoreResult<Player>;
}

/// Resolve a requested sort property, rejecting names the record does not have.
pub(crate) fn sort_field(name: &str) -> StoreResult<PlayerField> {
  PlayerField::parse(name)
    .ok_or_else(|| format!("No property '{}' found for type 'Player'", name).into())
}
