/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Database defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./depthframe.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Ingestion defaults
pub const DEFAULT_CSV_PATH: &str = "./data/frames.csv";
pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const MAX_CHUNK_SIZE: usize = 10_000;
pub const DEFAULT_SOURCE_WIDTH: usize = 200;
pub const DEFAULT_TARGET_WIDTH: usize = 150;

// Cache defaults
pub const DEFAULT_FRAME_CACHE_CAPACITY: usize = 1000;
pub const DEFAULT_RANGE_CACHE_CAPACITY: usize = 100;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
