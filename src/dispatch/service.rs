//! Player service: synchronous and pool-backed asynchronous forms of every
//! catalog operation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info};

use crate::cache::PlayerCache;
use crate::error::{Error, Result};
use crate::page::{PageRequest, PageResult, Paginator, DEFAULT_PAGE_SIZE};
use crate::player::{Player, PlayerStore, Players};

use super::handle::TaskHandle;
use super::pool::{PoolsConfig, WorkerPool};

/// The two independent pools behind the async operations.
pub struct Pools {
  /// List-all, single lookups and saves
  pub record: WorkerPool,
  /// Paginated listings only
  pub pagination: WorkerPool,
}

impl Pools {
  pub fn new(config: &PoolsConfig) -> Result<Self> {
    Ok(Self {
      record: WorkerPool::new("record", &config.record)?,
      pagination: WorkerPool::new("pagination", &config.pagination)?,
    })
  }
}

/// Which operation a listing request maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  /// Neither page nor size given: return the whole catalog
  All,
  Page { page: i64, size: i64 },
}

impl Route {
  pub fn from_params(page: Option<i64>, size: Option<i64>) -> Self {
    match (page, size) {
      (None, None) => Self::All,
      (page, size) => Self::Page {
        page: page.unwrap_or(0),
        size: size.unwrap_or(DEFAULT_PAGE_SIZE as i64),
      },
    }
  }
}

/// Result of a routed listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Listing {
  All(Players),
  Page(PageResult),
}

pub struct PlayerService<S: PlayerStore> {
  store: Arc<S>,
  paginator: Arc<Paginator<S>>,
  cache: Arc<PlayerCache<S>>,
  pools: Pools,
}

impl<S: PlayerStore> PlayerService<S> {
  /// Build a service whose lookups add `fetch_delay` on every cache miss.
  pub fn new(store: Arc<S>, pools: Pools, fetch_delay: Duration) -> Self {
    let cache = PlayerCache::new(Arc::clone(&store)).with_fetch_delay(fetch_delay);
    Self::with_cache(store, Arc::new(cache), pools)
  }

  /// Build a service around an existing cache handle.
  pub fn with_cache(store: Arc<S>, cache: Arc<PlayerCache<S>>, pools: Pools) -> Self {
    Self {
      paginator: Arc::new(Paginator::new(Arc::clone(&store))),
      store,
      cache,
      pools,
    }
  }

  pub fn cache(&self) -> &PlayerCache<S> {
    &self.cache
  }

  pub fn pools(&self) -> &Pools {
    &self.pools
  }

  // ==========================================================================
  // Synchronous forms
  // ==========================================================================

  /// Every player, unpaginated.
  pub fn list_all(&self) -> Result<Players> {
    list_all(self.store.as_ref())
  }

  pub fn get_page(
    &self,
    page: i64,
    size: i64,
    sort_by: Option<&str>,
    direction: Option<&str>,
  ) -> Result<PageResult> {
    let request = PageRequest::new(page, size, sort_by, direction)?;
    self.paginator.get_page(&request)
  }

  /// Look up one player. Store failures read as "not found".
  pub fn get_by_id(&self, player_id: &str) -> Option<Player> {
    self.cache.get(player_id)
  }

  /// Upsert a player and refresh its cache entry.
  pub fn save(&self, player: &Player) -> Result<Player> {
    save(self.store.as_ref(), self.cache.as_ref(), player)
  }

  /// Route to [`list_all`](Self::list_all) when neither page nor size is given,
  /// otherwise page with defaults for whichever is missing.
  pub fn listing(
    &self,
    page: Option<i64>,
    size: Option<i64>,
    sort_by: Option<&str>,
    direction: Option<&str>,
  ) -> Result<Listing> {
    match Route::from_params(page, size) {
      Route::All => self.list_all().map(Listing::All),
      Route::Page { page, size } => self
        .get_page(page, size, sort_by, direction)
        .map(Listing::Page),
    }
  }

  // ==========================================================================
  // Asynchronous forms
  // ==========================================================================

  pub fn list_all_async(&self) -> TaskHandle<Players> {
    let store = Arc::clone(&self.store);
    self.pools.record.submit(move || {
      observed("getPlayers", String::new(), || list_all(store.as_ref()))
    })
  }

  pub fn get_page_async(
    &self,
    page: i64,
    size: i64,
    sort_by: Option<&str>,
    direction: Option<&str>,
  ) -> TaskHandle<PageResult> {
    let pool = &self.pools.pagination;
    // Rejected before submission so a bad direction never occupies a worker
    let request = match PageRequest::new(page, size, sort_by, direction) {
      Ok(request) => request,
      Err(e) => return TaskHandle::failed(pool.name(), e),
    };

    let paginator = Arc::clone(&self.paginator);
    let detail = format!("page={}, size={}", request.page(), request.size());
    pool.submit(move || observed("getPlayersPaginated", detail, || paginator.get_page(&request)))
  }

  pub fn get_by_id_async(&self, player_id: &str) -> TaskHandle<Option<Player>> {
    let cache = Arc::clone(&self.cache);
    let player_id = player_id.to_string();
    let detail = format!("playerId={}", player_id);
    self.pools.record.submit(move || {
      observed("getPlayerById", detail, || Ok(cache.get(&player_id)))
    })
  }

  pub fn save_async(&self, player: Player) -> TaskHandle<Player> {
    let store = Arc::clone(&self.store);
    let cache = Arc::clone(&self.cache);
    let detail = format!("playerId={}", player.player_id);
    self.pools.record.submit(move || {
      observed("savePlayer", detail, || save(store.as_ref(), cache.as_ref(), &player))
    })
  }
}

fn list_all<S: PlayerStore>(store: &S) -> Result<Players> {
  store.find_all().map(Players::from).map_err(|e| {
    error!("exception in getPlayers: {}", e);
    Error::retrieval("retrieve players", e)
  })
}

fn save<S: PlayerStore>(store: &S, cache: &PlayerCache<S>, player: &Player) -> Result<Player> {
  let saved = store.save(player).map_err(|e| {
    error!(player_id = %player.player_id, "exception in savePlayer: {}", e);
    Error::retrieval("save player", e)
  })?;
  cache.refresh(&saved);
  info!(player_id = %saved.player_id, "player saved");
  Ok(saved)
}

/// Run `task` on the current worker, logging start and completion with the
/// worker's thread name and elapsed time.
fn observed<T>(operation: &str, detail: String, task: impl FnOnce() -> Result<T>) -> Result<T> {
  let current = std::thread::current();
  let worker = current.name().unwrap_or("unnamed");
  info!(worker, operation, %detail, "starting async operation");

  let started = Instant::now();
  let result = task();
  let elapsed_ms = started.elapsed().as_millis() as u64;

  match &result {
    Ok(_) => info!(worker, operation, %detail, elapsed_ms, "completed async operation"),
    Err(e) => error!(worker, operation, %detail, elapsed_ms, "exception in async operation: {}", e),
  }
  result
}
