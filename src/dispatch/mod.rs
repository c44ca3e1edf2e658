//! Dispatch layer.
//!
//! Every catalog operation has a blocking form that runs on the caller's thread
//! and an async form that runs on one of two independent bounded pools:
//! - `record`: list-all, single lookups and saves
//! - `pagination`: paginated listings
//!
//! Keeping the classes apart means a burst of slow lookups can only exhaust the
//! record pool; paginated requests keep their own threads and queue.

mod handle;
mod pool;
mod service;

pub use handle::TaskHandle;
pub use pool::{PoolConfig, PoolsConfig, WorkerPool};
pub use service::{Listing, PlayerService, Pools, Route};
