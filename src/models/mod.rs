//! Domain models for depth-keyed frames and ingestion reporting

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical identity of a frame: its depth quantized to millidepth units.
///
/// Raw depths arrive as floats, and float equality is no basis for a
/// primary key or a cache key. Every boundary (CSV parsing, point lookups,
/// range bounds, storage) quantizes through this type, so two inputs that
/// differ only below 1e-3 always collapse to the same key, and keys hash
/// and order exactly. Ascending integer order equals ascending depth order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthKey(i64);

impl DepthKey {
    /// Millidepth resolution: 1/1000 of a depth unit.
    pub const SCALE: f64 = 1000.0;

    /// Quantize a raw depth. Returns `None` for NaN and infinities, which
    /// can never identify a frame.
    pub fn from_f64(depth: f64) -> Option<Self> {
        if !depth.is_finite() {
            return None;
        }
        Some(Self((depth * Self::SCALE).round() as i64))
    }

    /// The canonical depth value this key represents.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / Self::SCALE
    }

    /// Raw millidepth units, the form the store persists.
    pub fn millis(&self) -> i64 {
        self.0
    }

    pub fn from_millis(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DepthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

/// A persisted frame: one colorized, PNG-encoded scanline keyed by depth.
///
/// `pixels` holds the encoded PNG bytes and is immutable once written;
/// re-ingesting the same source row produces byte-identical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub depth: DepthKey,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A frame ready to be written; timestamps are assigned by the store on
/// upsert (`created_at` preserved across overwrites, `updated_at`
/// refreshed).
#[derive(Debug, Clone, PartialEq)]
pub struct NewFrame {
    pub depth: DepthKey,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Parameters of a depth-range scan; doubles as the range-cache key.
///
/// Bounds are inclusive; `None` leaves that side unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeQuery {
    pub depth_min: Option<DepthKey>,
    pub depth_max: Option<DepthKey>,
    pub limit: u64,
    pub offset: u64,
}

impl RangeQuery {
    pub const DEFAULT_LIMIT: u64 = 100;
    pub const MAX_LIMIT: u64 = 1000;

    /// Build a query from raw depth bounds, clamping `limit` into
    /// `1..=MAX_LIMIT`. Non-finite bounds are treated as unbounded.
    pub fn bounded(
        depth_min: Option<f64>,
        depth_max: Option<f64>,
        limit: u64,
        offset: u64,
    ) -> Self {
        Self {
            depth_min: depth_min.and_then(DepthKey::from_f64),
            depth_max: depth_max.and_then(DepthKey::from_f64),
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset,
        }
    }
}

impl Default for RangeQuery {
    fn default() -> Self {
        Self {
            depth_min: None,
            depth_max: None,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Result of a range scan: the page of frames in ascending depth order,
/// plus whether more rows exist past `offset + limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeScanResult {
    pub frames: Vec<Frame>,
    pub has_more: bool,
}

/// Overall outcome of an ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    /// Every row read was transformed and written
    Success,
    /// Some rows failed, some were written
    Partial,
    /// Every row read failed; nothing was written
    Failed,
}

impl fmt::Display for IngestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IngestStatus::Success => "success",
            IngestStatus::Partial => "partial",
            IngestStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Summary of a completed ingestion run.
///
/// Row-level failures are tallied here rather than raised; a run only
/// errors out when the store itself cannot be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub status: IngestStatus,
    pub rows_read: u64,
    pub rows_failed: u64,
    pub frames_written: u64,
    pub duration_seconds: f64,
}

impl IngestReport {
    /// Status rules: all rows written = success, all rows failed = failed,
    /// anything in between = partial. An empty source is a success.
    pub fn status_for(rows_read: u64, rows_failed: u64) -> IngestStatus {
        if rows_failed == 0 {
            IngestStatus::Success
        } else if rows_failed == rows_read {
            IngestStatus::Failed
        } else {
            IngestStatus::Partial
        }
    }

    pub fn rows_per_second(&self) -> f64 {
        if self.duration_seconds > 0.0 {
            self.rows_read as f64 / self.duration_seconds
        } else {
            0.0
        }
    }
}

/// Structural summary of a source CSV, produced without transforming rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvSummary {
    pub path: String,
    pub total_rows: u64,
    pub column_count: usize,
    pub sample_columns: usize,
    pub sample_depths: Vec<f64>,
    pub file_size_bytes: u64,
    pub estimated_memory_bytes: u64,
}
