//! End-to-end ingestion against a real SQLite store
//!
//! Exercises the whole write path: CSV parsing, the transform pipeline,
//! SeaORM upserts and cache invalidation, then reads the results back
//! through range scans.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use depthframe::{
    config::{CacheConfig, DatabaseConfig},
    database::{
        Database,
        repositories::{FrameSeaOrmRepository, FrameStore},
    },
    ingestor::{CsvScanlineReader, IngestionPipeline},
    models::{DepthKey, IngestStatus, RangeQuery},
    processing::Transform,
    services::frame_cache::CacheCoordinator,
};

const SOURCE_WIDTH: usize = 200;
const TARGET_WIDTH: usize = 150;

async fn sqlite_store() -> Result<Arc<dyn FrameStore>> {
    // One connection: each pooled in-memory SQLite connection would
    // otherwise see its own empty database.
    let database = Database::new(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await?;
    database.migrate().await?;
    Ok(Arc::new(FrameSeaOrmRepository::new(database.connection())))
}

fn coordinator() -> Arc<CacheCoordinator> {
    Arc::new(CacheCoordinator::new(&CacheConfig {
        frame_capacity: 32,
        range_capacity: 8,
        ttl: Duration::from_secs(60),
    }))
}

fn pipeline(store: Arc<dyn FrameStore>, cache: Arc<CacheCoordinator>) -> IngestionPipeline {
    let transform = Transform::new(SOURCE_WIDTH, TARGET_WIDTH).unwrap();
    IngestionPipeline::new(store, transform, cache, 2)
}

/// A valid data row: the depth followed by a 0..199 ramp.
fn ramp_row(depth: f64) -> String {
    let samples: Vec<String> = (0..SOURCE_WIDTH).map(|i| i.to_string()).collect();
    format!("{},{}", depth, samples.join(","))
}

fn csv_with_rows(rows: &[String]) -> String {
    let header: Vec<String> = std::iter::once("depth".to_string())
        .chain((0..SOURCE_WIDTH).map(|i| i.to_string()))
        .collect();
    let mut csv = header.join(",");
    csv.push('\n');
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    csv
}

fn reader(csv: &str) -> CsvScanlineReader<&[u8]> {
    CsvScanlineReader::from_reader(csv.as_bytes(), SOURCE_WIDTH).unwrap()
}

#[tokio::test]
async fn ramp_scenario_ingests_and_scans_three_frames() -> Result<()> {
    let store = sqlite_store().await?;
    let pipeline = pipeline(store.clone(), coordinator());
    let csv = csv_with_rows(&[ramp_row(100.0), ramp_row(100.5), ramp_row(101.0)]);

    let report = pipeline.run(reader(&csv), false).await?;
    assert_eq!(report.status, IngestStatus::Success);
    assert_eq!(report.frames_written, 3);

    let result = store
        .range_scan(&RangeQuery::bounded(Some(100.0), Some(101.0), 10, 0))
        .await?;
    assert_eq!(result.frames.len(), 3);
    assert!(!result.has_more);

    let depths: Vec<f64> = result.frames.iter().map(|f| f.depth.as_f64()).collect();
    assert_eq!(depths, vec![100.0, 100.5, 101.0]);
    for frame in &result.frames {
        assert_eq!(frame.width, TARGET_WIDTH as u32);
        assert_eq!(frame.height, 1);
        let decoded = image::load_from_memory(&frame.pixels)?.to_rgb8();
        assert_eq!(decoded.width(), TARGET_WIDTH as u32);
        assert_eq!(decoded.height(), 1);
    }

    // A second identical run leaves the count at 3.
    pipeline.run(reader(&csv), false).await?;
    let again = store.range_scan(&RangeQuery::default()).await?;
    assert_eq!(again.frames.len(), 3);
    Ok(())
}

#[tokio::test]
async fn reingestion_preserves_pixels_and_created_at() -> Result<()> {
    let store = sqlite_store().await?;
    let pipeline = pipeline(store.clone(), coordinator());
    let csv = csv_with_rows(&[ramp_row(10.0)]);
    let depth = DepthKey::from_f64(10.0).unwrap();

    pipeline.run(reader(&csv), false).await?;
    let first = store.get(depth).await?.unwrap();

    pipeline.run(reader(&csv), false).await?;
    let second = store.get(depth).await?.unwrap();

    assert_eq!(first.pixels, second.pixels);
    assert_eq!(first.created_at, second.created_at);
    assert!(second.updated_at >= first.updated_at);
    Ok(())
}

#[tokio::test]
async fn malformed_rows_yield_a_partial_report() -> Result<()> {
    let store = sqlite_store().await?;
    let pipeline = pipeline(store.clone(), coordinator());
    let csv = csv_with_rows(&[
        ramp_row(1.0),
        "not_a_depth,1,2,3".to_string(),
        ramp_row(2.0),
        "3.0,short,row".to_string(),
    ]);

    let report = pipeline.run(reader(&csv), false).await?;

    assert_eq!(report.status, IngestStatus::Partial);
    assert_eq!(report.rows_read, 4);
    assert_eq!(report.rows_failed, 2);
    assert_eq!(report.frames_written, 2);

    let stored = store.range_scan(&RangeQuery::default()).await?;
    assert_eq!(stored.frames.len(), 2);
    Ok(())
}

#[tokio::test]
async fn clear_existing_replaces_the_whole_store() -> Result<()> {
    let store = sqlite_store().await?;
    let pipeline = pipeline(store.clone(), coordinator());

    let old = csv_with_rows(&[ramp_row(1.0), ramp_row(2.0)]);
    pipeline.run(reader(&old), false).await?;

    let new = csv_with_rows(&[ramp_row(50.0)]);
    pipeline.run(reader(&new), true).await?;

    let stored = store.range_scan(&RangeQuery::default()).await?;
    assert_eq!(stored.frames.len(), 1);
    assert_eq!(stored.frames[0].depth, DepthKey::from_f64(50.0).unwrap());
    Ok(())
}

#[tokio::test]
async fn range_scan_paginates_with_has_more() -> Result<()> {
    let store = sqlite_store().await?;
    let pipeline = pipeline(store.clone(), coordinator());
    let rows: Vec<String> = (0..5).map(|i| ramp_row(i as f64)).collect();
    pipeline.run(reader(&csv_with_rows(&rows)), false).await?;

    let first_page = store
        .range_scan(&RangeQuery::bounded(None, None, 2, 0))
        .await?;
    assert_eq!(first_page.frames.len(), 2);
    assert!(first_page.has_more);

    let last_page = store
        .range_scan(&RangeQuery::bounded(None, None, 2, 4))
        .await?;
    assert_eq!(last_page.frames.len(), 1);
    assert!(!last_page.has_more);
    Ok(())
}

#[tokio::test]
async fn sub_millidepth_duplicates_collapse_to_one_frame() -> Result<()> {
    let store = sqlite_store().await?;
    let pipeline = pipeline(store.clone(), coordinator());
    // Two rows whose depths differ only below the quantization step.
    let csv = csv_with_rows(&[ramp_row(7.0001), ramp_row(7.000_15)]);

    pipeline.run(reader(&csv), false).await?;

    let stored = store.range_scan(&RangeQuery::default()).await?;
    assert_eq!(stored.frames.len(), 1);
    Ok(())
}
