//! TTL+LRU caching for the frame read path

pub mod coordinator;
pub mod ttl;

pub use coordinator::{CacheCoordinator, CoordinatorStats};
pub use ttl::{CacheStats, TtlCache};
