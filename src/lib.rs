//! Player catalog retrieval core: a memoizing single-record cache, a pagination
//! engine and a dispatch layer with isolated worker pools, all sitting in front
//! of a pluggable record store.

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod page;
pub mod player;

pub use cache::PlayerCache;
pub use dispatch::{Listing, PlayerService, Pools, TaskHandle};
pub use error::{Error, Result};
pub use page::{PageRequest, PageResult, SortDirection};
pub use player::{MemoryStore, Player, PlayerStore, Players, SqliteStore};
