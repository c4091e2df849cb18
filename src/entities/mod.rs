//! `SeaORM` entity definitions

pub mod frames;
pub mod prelude;
