//! In-memory frame store
//!
//! A `BTreeMap` keyed by `DepthKey` gives ordered range scans for free.
//! Used by tests and by embedders that want the full pipeline without a
//! database; behavior matches the SeaORM repository, including timestamp
//! handling on overwrites.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::repositories::traits::FrameStore;
use crate::errors::StoreResult;
use crate::models::{DepthKey, Frame, NewFrame, RangeQuery, RangeScanResult};

#[derive(Default)]
pub struct MemoryFrameStore {
    frames: RwLock<BTreeMap<DepthKey, Frame>>,
}

impl MemoryFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.frames.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl FrameStore for MemoryFrameStore {
    async fn get(&self, depth: DepthKey) -> StoreResult<Option<Frame>> {
        Ok(self.frames.read().await.get(&depth).cloned())
    }

    async fn range_scan(&self, query: &RangeQuery) -> StoreResult<RangeScanResult> {
        // An inverted range matches nothing (BTreeMap::range would panic).
        if let (Some(min), Some(max)) = (query.depth_min, query.depth_max) {
            if min > max {
                return Ok(RangeScanResult {
                    frames: Vec::new(),
                    has_more: false,
                });
            }
        }

        let lower = query
            .depth_min
            .map_or(Bound::Unbounded, Bound::Included);
        let upper = query
            .depth_max
            .map_or(Bound::Unbounded, Bound::Included);

        let map = self.frames.read().await;
        let mut matched = map
            .range((lower, upper))
            .skip(query.offset as usize)
            .map(|(_, frame)| frame.clone());

        let mut frames = Vec::new();
        for _ in 0..query.limit {
            match matched.next() {
                Some(frame) => frames.push(frame),
                None => break,
            }
        }
        let has_more = matched.next().is_some();

        Ok(RangeScanResult { frames, has_more })
    }

    async fn upsert(&self, frame: NewFrame) -> StoreResult<()> {
        let now = Utc::now();
        let mut map = self.frames.write().await;
        let created_at = map
            .get(&frame.depth)
            .map_or(now, |existing| existing.created_at);
        map.insert(
            frame.depth,
            Frame {
                depth: frame.depth,
                width: frame.width,
                height: frame.height,
                pixels: frame.pixels,
                created_at,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn clear_all(&self) -> StoreResult<u64> {
        let mut map = self.frames.write().await;
        let removed = map.len() as u64;
        map.clear();
        Ok(removed)
    }
}
