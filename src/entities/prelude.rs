//! `SeaORM` Entity prelude

pub use super::frames::Entity as Frames;
