//! Service layer: caching and the frame read path

pub mod frame_cache;
pub mod frame_service;

pub use frame_service::FrameService;
