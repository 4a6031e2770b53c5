//! # Breakroom Migrations
//!
//! Schema migrations, dictionary seeds and database connection helpers.
//!
//! The schema avoids backend specific types (enums are plain strings that
//! reference dictionary tables) so the same migrations run on PostgreSQL in
//! production and on SQLite in tests.

pub use sea_orm_migration::prelude::*;

pub mod db;
mod m20261001_000001_create_dictionaries;
mod m20261001_000002_create_users_table;
mod m20261001_000003_create_organisations_table;
mod m20261001_000004_create_groups_table;
mod m20261001_000005_create_offers_table;
mod m20261001_000006_create_replacements_table;
pub mod migrator;
pub mod seeds;

pub use db::{connect_to_database, DatabaseConfig};
pub use migrator::Migrator;
