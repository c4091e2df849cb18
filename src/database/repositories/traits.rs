//! The frame persistence contract
//!
//! Everything above the storage layer talks to frames exclusively through
//! `FrameStore`; which engine sits behind it is an implementation detail.
//! Implementations must be safe under arbitrary concurrent readers.

use async_trait::async_trait;

use crate::errors::StoreResult;
use crate::models::{DepthKey, Frame, NewFrame, RangeQuery, RangeScanResult};

/// Abstract persistence for depth-keyed frames.
#[async_trait]
pub trait FrameStore: Send + Sync {
    /// Fetch the frame at exactly this depth, if one exists.
    async fn get(&self, depth: DepthKey) -> StoreResult<Option<Frame>>;

    /// Fetch a page of frames in ascending depth order.
    ///
    /// Bounds are inclusive; a `None` bound is unbounded. `has_more` in
    /// the result reports whether rows exist beyond `offset + limit`.
    /// For identical arguments over an unchanged store the result is
    /// deterministic, which lets callers cache it.
    async fn range_scan(&self, query: &RangeQuery) -> StoreResult<RangeScanResult>;

    /// Insert or overwrite the frame at `frame.depth`.
    ///
    /// Overwrites preserve `created_at` and refresh `updated_at`; this is
    /// what makes re-ingesting the same source idempotent.
    async fn upsert(&self, frame: NewFrame) -> StoreResult<()>;

    /// Delete every frame, returning how many were removed. Used before a
    /// full reload.
    async fn clear_all(&self) -> StoreResult<u64>;
}
