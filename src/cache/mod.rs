//! Single-record cache.
//!
//! This module provides an in-process memo in front of the record store that:
//! - Remembers found and confirmed-absent lookups by player id
//! - Never remembers a failed fetch, so the next lookup retries the store
//! - Is safe to share between threads without external locking

mod layer;
mod stats;

pub use layer::PlayerCache;
pub use stats::StatsSnapshot;
