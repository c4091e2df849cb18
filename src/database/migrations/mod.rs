//! SeaORM migrations for multi-database support
//!
//! Migrations are database-agnostic and work across SQLite and PostgreSQL.

use sea_orm_migration::prelude::*;

pub mod m20260815_000001_create_frames_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260815_000001_create_frames_table::Migration)]
    }
}
