//! Shared utilities

pub mod human_format;
