//! SeaORM-based frame repository
//!
//! Database-agnostic `FrameStore` implementation over the `frames` table,
//! working on SQLite and PostgreSQL through the same code path.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::database::repositories::traits::FrameStore;
use crate::entities::{frames, prelude::Frames};
use crate::errors::{StoreError, StoreResult};
use crate::models::{DepthKey, Frame, NewFrame, RangeQuery, RangeScanResult};

/// SeaORM-backed repository for frame operations
#[derive(Clone)]
pub struct FrameSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl FrameSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    fn model_to_frame(model: frames::Model) -> Frame {
        Frame {
            depth: DepthKey::from_millis(model.depth_millis),
            width: model.width as u32,
            height: model.height as u32,
            pixels: model.pixels,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl FrameStore for FrameSeaOrmRepository {
    async fn get(&self, depth: DepthKey) -> StoreResult<Option<Frame>> {
        let model = Frames::find_by_id(depth.millis())
            .one(&*self.connection)
            .await
            .map_err(|e| StoreError::Unavailable {
                phase: "point lookup",
                message: format!("depth {depth}: {e}"),
            })?;

        Ok(model.map(Self::model_to_frame))
    }

    async fn range_scan(&self, query: &RangeQuery) -> StoreResult<RangeScanResult> {
        let mut find = Frames::find();
        if let Some(min) = query.depth_min {
            find = find.filter(frames::Column::DepthMillis.gte(min.millis()));
        }
        if let Some(max) = query.depth_max {
            find = find.filter(frames::Column::DepthMillis.lte(max.millis()));
        }

        // Probe one row past the page to learn whether more exist.
        let probe = query.limit.saturating_add(1);
        let models = find
            .order_by_asc(frames::Column::DepthMillis)
            .offset(query.offset)
            .limit(probe)
            .all(&*self.connection)
            .await
            .map_err(|e| StoreError::unavailable("range scan", e))?;

        let has_more = models.len() as u64 > query.limit;
        let frames = models
            .into_iter()
            .take(query.limit as usize)
            .map(Self::model_to_frame)
            .collect();

        Ok(RangeScanResult { frames, has_more })
    }

    async fn upsert(&self, frame: NewFrame) -> StoreResult<()> {
        let now = Utc::now();
        let depth = frame.depth;
        let active_model = frames::ActiveModel {
            depth_millis: Set(frame.depth.millis()),
            pixels: Set(frame.pixels),
            width: Set(frame.width as i32),
            height: Set(frame.height as i32),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Existing rows keep their created_at; everything else is replaced.
        Frames::insert(active_model)
            .on_conflict(
                OnConflict::column(frames::Column::DepthMillis)
                    .update_columns([
                        frames::Column::Pixels,
                        frames::Column::Width,
                        frames::Column::Height,
                        frames::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&*self.connection)
            .await
            .map_err(|e| StoreError::Unavailable {
                phase: "upsert",
                message: format!("depth {depth}: {e}"),
            })?;

        Ok(())
    }

    async fn clear_all(&self) -> StoreResult<u64> {
        let result = Frames::delete_many()
            .exec(&*self.connection)
            .await
            .map_err(|e| StoreError::unavailable("clear", e))?;

        Ok(result.rows_affected)
    }
}
