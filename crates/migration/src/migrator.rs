//! # Database Migrator
//!
//! Registers every migration in execution order.

use sea_orm_migration::prelude::*;

use crate::{
    m20261001_000001_create_dictionaries,
    m20261001_000002_create_users_table,
    m20261001_000003_create_organisations_table,
    m20261001_000004_create_groups_table,
    m20261001_000005_create_offers_table,
    m20261001_000006_create_replacements_table,
};

/// The main migrator.
///
/// # Example
///
/// ```rust,ignore
/// use migration::{Migrator, MigratorTrait};
///
/// Migrator::up(&db, None).await?;
/// ```
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// Dictionaries first: later tables reference their codes.
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_dictionaries::Migration),
            Box::new(m20261001_000002_create_users_table::Migration),
            Box::new(m20261001_000003_create_organisations_table::Migration),
            Box::new(m20261001_000004_create_groups_table::Migration),
            Box::new(m20261001_000005_create_offers_table::Migration),
            Box::new(m20261001_000006_create_replacements_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();

        assert_eq!(names.len(), 6);
        assert_eq!(names, sorted, "migrations must be registered in name order");
    }
}
