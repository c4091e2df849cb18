//! Frame store implementations
//!
//! `traits::FrameStore` is the contract; `frame` provides the SeaORM
//! implementation used in production, `memory` an ordered in-memory one
//! for tests and embedded use.

pub mod frame;
pub mod memory;
pub mod traits;

// Re-export for convenience
pub use frame::FrameSeaOrmRepository;
pub use memory::MemoryFrameStore;
pub use traits::FrameStore;
