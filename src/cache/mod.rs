// Cache module for gist listings.
// Pluggable stores (memory or filesystem) with per-entry TTL.

pub mod clock;
pub mod memory;
pub mod paths;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::MemoryStore;
pub use store::{CacheEntry, CacheStore, CachedGists, FAILURE_TTL, FileStore, SUCCESS_TTL};
