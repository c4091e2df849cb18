//! Cache coordination for the frame read path
//!
//! Two caches back the serving layer: one for single-frame lookups keyed
//! by depth, one for range scans keyed by the full query tuple. The
//! coordinator owns both; nothing else in the crate is handed a cache
//! reference, so invalidation and statistics always cover the pair
//! together. The instances stay independent: different capacities,
//! separate locks, no shared contention between point and range traffic.

use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::debug;

use crate::config::CacheConfig;
use crate::models::{DepthKey, Frame, RangeQuery, RangeScanResult};
use crate::services::frame_cache::ttl::{CacheStats, TtlCache};

/// Combined statistics snapshot, one namespace per cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinatorStats {
    pub frame_cache: CacheStats,
    pub range_cache: CacheStats,
}

/// Owner of the point and range caches; the sole access path to either.
pub struct CacheCoordinator {
    frame_cache: TtlCache<DepthKey, Frame>,
    range_cache: TtlCache<RangeQuery, RangeScanResult>,
}

impl CacheCoordinator {
    /// Both caches share one TTL; capacities are clamped to at least one
    /// entry (config validation rejects zero before this point).
    pub fn new(config: &CacheConfig) -> Self {
        let frame_capacity =
            NonZeroUsize::new(config.frame_capacity).unwrap_or(NonZeroUsize::MIN);
        let range_capacity =
            NonZeroUsize::new(config.range_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            frame_cache: TtlCache::new(frame_capacity, config.ttl),
            range_cache: TtlCache::new(range_capacity, config.ttl),
        }
    }

    pub async fn lookup_frame(&self, depth: DepthKey) -> Option<Frame> {
        self.frame_cache.get(&depth).await
    }

    pub async fn store_frame(&self, depth: DepthKey, frame: Frame) {
        self.frame_cache.put(depth, frame).await;
    }

    pub async fn lookup_range(&self, query: &RangeQuery) -> Option<RangeScanResult> {
        self.range_cache.get(query).await
    }

    pub async fn store_range(&self, query: RangeQuery, result: RangeScanResult) {
        self.range_cache.put(query, result).await;
    }

    /// Drop every cached frame and range result. Called after each
    /// ingestion run and after bulk clears; once this returns, no entry
    /// cached before the call can be served again.
    pub async fn invalidate_all(&self) {
        let frames = self.frame_cache.len().await;
        let ranges = self.range_cache.len().await;
        self.frame_cache.invalidate_all().await;
        self.range_cache.invalidate_all().await;
        debug!(
            "Invalidated caches: dropped {} frame entries and {} range entries",
            frames, ranges
        );
    }

    /// Housekeeping sweep; returns (expired frames, expired ranges).
    pub async fn purge_expired(&self) -> (usize, usize) {
        let frames = self.frame_cache.purge_expired().await;
        let ranges = self.range_cache.purge_expired().await;
        if frames > 0 || ranges > 0 {
            debug!(
                "Purged expired cache entries: {} frames, {} ranges",
                frames, ranges
            );
        }
        (frames, ranges)
    }

    pub async fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            frame_cache: self.frame_cache.stats().await,
            range_cache: self.range_cache.stats().await,
        }
    }
}
