//! Player records and the stores that hold them.

mod memory;
mod sqlite;
mod store;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{PlayerStore, StoredPage};
pub use types::{Player, PlayerField, Players};
