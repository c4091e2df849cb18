//! CSV scanline ingestion
//!
//! One pipeline run consumes a CSV source chunk by chunk, transforms each
//! parsed scanline into a PNG frame and upserts it into the store.
//! Malformed rows are counted and skipped; only the store going away
//! aborts a run. After any run that may have changed the store, both
//! read caches are invalidated.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::database::repositories::FrameStore;
use crate::errors::{IngestError, IngestResult};
use crate::models::{CsvSummary, IngestReport};
use crate::processing::Transform;
use crate::services::frame_cache::CacheCoordinator;

pub mod csv_source;

pub use csv_source::{CsvScanlineReader, RawScanline, RowOutcome};

/// How many chunks pass between progress log lines.
const PROGRESS_LOG_EVERY_CHUNKS: u64 = 10;

/// Chunked, idempotent scanline ingestion into a frame store.
///
/// One instance owns its collaborators for the duration of a run; a
/// second concurrent run against the same store is a caller error this
/// type does not arbitrate.
pub struct IngestionPipeline {
    store: Arc<dyn FrameStore>,
    transform: Transform,
    cache: Arc<CacheCoordinator>,
    chunk_size: usize,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn FrameStore>,
        transform: Transform,
        cache: Arc<CacheCoordinator>,
        chunk_size: usize,
    ) -> Self {
        Self {
            store,
            transform,
            cache,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Run the pipeline to completion over one CSV source.
    ///
    /// With `clear_existing`, every stored frame is deleted before the
    /// first row is read; a failed clear aborts the run. Row-level
    /// failures (bad shape, unparseable cells, transform rejection) are
    /// tallied into the report and never abort; a store write failure
    /// aborts after a best-effort cache invalidation. Both caches are
    /// invalidated unconditionally once the stream is drained.
    pub async fn run<R: Read>(
        &self,
        mut reader: CsvScanlineReader<R>,
        clear_existing: bool,
    ) -> IngestResult<IngestReport> {
        let started = Instant::now();

        if clear_existing {
            let removed = self.store.clear_all().await?;
            // Readers must not keep serving frames that no longer exist.
            self.cache.invalidate_all().await;
            info!("Cleared {} existing frames before ingestion", removed);
        }

        let mut rows_read: u64 = 0;
        let mut rows_failed: u64 = 0;
        let mut frames_written: u64 = 0;
        let mut chunks: u64 = 0;

        loop {
            // Any error after the first upsert leaves the store partially
            // rewritten; drop whatever the caches hold before surfacing it.
            let chunk = match reader.read_chunk(self.chunk_size) {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.cache.invalidate_all().await;
                    return Err(e);
                }
            };
            if chunk.is_empty() {
                break;
            }
            chunks += 1;

            for outcome in chunk {
                rows_read += 1;
                let scanline = match outcome {
                    RowOutcome::Parsed(scanline) => scanline,
                    RowOutcome::Malformed { line, reason } => {
                        warn!("Skipping malformed row at line {}: {}", line, reason);
                        rows_failed += 1;
                        continue;
                    }
                };

                let frame = match self.transform.apply(scanline.depth, &scanline.samples) {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!("Skipping row at depth {}: {}", scanline.depth, e);
                        rows_failed += 1;
                        continue;
                    }
                };

                if let Err(e) = self.store.upsert(frame).await {
                    self.cache.invalidate_all().await;
                    return Err(IngestError::Store(e));
                }
                frames_written += 1;
            }

            if chunks % PROGRESS_LOG_EVERY_CHUNKS == 0 {
                let elapsed = started.elapsed().as_secs_f64();
                info!(
                    "Ingestion progress: {} rows read, {} written, {} failed ({:.0} rows/s)",
                    rows_read,
                    frames_written,
                    rows_failed,
                    if elapsed > 0.0 {
                        rows_read as f64 / elapsed
                    } else {
                        0.0
                    }
                );
            }
        }

        // The store contents may have changed for any key.
        self.cache.invalidate_all().await;

        let report = IngestReport {
            status: IngestReport::status_for(rows_read, rows_failed),
            rows_read,
            rows_failed,
            frames_written,
            duration_seconds: started.elapsed().as_secs_f64(),
        };
        info!(
            "Ingestion finished: status={}, {} rows read, {} written, {} failed in {:.2}s",
            report.status,
            report.rows_read,
            report.frames_written,
            report.rows_failed,
            report.duration_seconds
        );
        Ok(report)
    }
}

/// Probe a CSV source's structure without transforming anything.
///
/// Counts rows and columns, samples the first few depths and estimates
/// the peak decoded size of one full in-memory pass (one byte per sample
/// plus the depth per row). Malformed rows still count toward the total;
/// this is a shape report, not a validation pass.
pub fn inspect_csv(path: impl AsRef<Path>) -> IngestResult<CsvSummary> {
    const SAMPLE_DEPTHS: usize = 5;

    let path = path.as_ref();
    let file_size_bytes = std::fs::metadata(path)?.len();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let column_count = reader.headers()?.len();
    let sample_columns = column_count.saturating_sub(1);

    let mut total_rows: u64 = 0;
    let mut sample_depths = Vec::with_capacity(SAMPLE_DEPTHS);
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        total_rows += 1;
        if sample_depths.len() < SAMPLE_DEPTHS {
            if let Ok(depth) = record
                .get(0)
                .unwrap_or_default()
                .trim()
                .parse::<f64>()
            {
                sample_depths.push(depth);
            }
        }
    }

    let estimated_memory_bytes =
        total_rows * (sample_columns as u64 + std::mem::size_of::<f64>() as u64);

    Ok(CsvSummary {
        path: path.display().to_string(),
        total_rows,
        column_count,
        sample_columns,
        sample_depths,
        file_size_bytes,
        estimated_memory_bytes,
    })
}
