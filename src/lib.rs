//! depthframe: depth-keyed scanline colorization and serving core
//!
//! Ingests tabular depth-indexed grayscale scanlines, turns each into a
//! small colorized PNG raster, persists it keyed by depth, and serves
//! point and range queries through a TTL+LRU cache layer.

pub mod config;
pub mod database;
pub mod entities;
pub mod errors;
pub mod ingestor;
pub mod models;
pub mod processing;
pub mod services;
pub mod utils;
