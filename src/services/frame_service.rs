//! Read path for frames: cache first, store on miss, repopulate
//!
//! The serving layer never touches the caches directly; this facade pairs
//! the store with the `CacheCoordinator` so every read follows the same
//! read-through discipline. Concurrent lookups of the same cold key may
//! each fall through to the store and fill the cache; the last fill wins,
//! and since fills are pure store reads that race is harmless.

use std::sync::Arc;

use tracing::debug;

use crate::database::repositories::FrameStore;
use crate::errors::StoreResult;
use crate::models::{DepthKey, Frame, RangeQuery, RangeScanResult};
use crate::services::frame_cache::{CacheCoordinator, CoordinatorStats};

pub struct FrameService {
    store: Arc<dyn FrameStore>,
    cache: Arc<CacheCoordinator>,
}

impl FrameService {
    pub fn new(store: Arc<dyn FrameStore>, cache: Arc<CacheCoordinator>) -> Self {
        Self { store, cache }
    }

    /// Fetch the frame at exactly this depth.
    ///
    /// Present frames are cached on the way out; absent depths are not,
    /// so a frame ingested later becomes visible as soon as it lands.
    pub async fn frame_at(&self, depth: DepthKey) -> StoreResult<Option<Frame>> {
        if let Some(frame) = self.cache.lookup_frame(depth).await {
            debug!("Frame cache hit for depth {}", depth);
            return Ok(Some(frame));
        }

        let fetched = self.store.get(depth).await?;
        if let Some(frame) = &fetched {
            self.cache.store_frame(depth, frame.clone()).await;
        }
        Ok(fetched)
    }

    /// Fetch a page of frames by depth range.
    ///
    /// The full query tuple is the cache key, and results are cached even
    /// when empty: an empty page is as deterministic as a full one.
    pub async fn frames_in_range(&self, query: RangeQuery) -> StoreResult<RangeScanResult> {
        if let Some(result) = self.cache.lookup_range(&query).await {
            debug!(
                "Range cache hit for [{:?}, {:?}] limit {} offset {}",
                query.depth_min, query.depth_max, query.limit, query.offset
            );
            return Ok(result);
        }

        let result = self.store.range_scan(&query).await?;
        self.cache.store_range(query, result.clone()).await;
        Ok(result)
    }

    pub async fn cache_stats(&self) -> CoordinatorStats {
        self.cache.stats().await
    }
}
