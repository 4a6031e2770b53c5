//! # Seed Data Management
//!
//! Reference rows for the dictionary tables (positions, shift statuses and
//! break statuses). Seeds are idempotent: rows whose code already exists are
//! skipped, so they can run on every migration and from the CLI.

use std::time::Instant;

use ::error::{AppError, SeedResult};
use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryRow {
    /// Stable code referenced by other tables
    pub code:  &'static str,
    /// Human readable name
    pub name:  &'static str,
    /// Display order
    pub sort:  i16,
    /// Badge colour, only used by shift statuses
    pub color: Option<&'static str>,
}

impl DictionaryRow {
    const fn new(code: &'static str, name: &'static str, sort: i16) -> Self {
        Self {
            code,
            name,
            sort,
            color: None,
        }
    }

    const fn coloured(code: &'static str, name: &'static str, sort: i16, color: &'static str) -> Self {
        Self {
            code,
            name,
            sort,
            color: Some(color),
        }
    }
}

/// Trait for seed data providers
///
/// Implement this trait to provide seed data for a dictionary table.
pub trait SeedProvider: Send + Sync {
    /// The name of this seed
    fn name(&self) -> &'static str;

    /// Target table
    fn table(&self) -> &'static str;

    /// Rows to insert
    fn rows(&self) -> Vec<DictionaryRow>;
}

/// Employee positions.
#[derive(Debug, Default)]
pub struct PositionsSeed;

impl SeedProvider for PositionsSeed {
    fn name(&self) -> &'static str { "positions" }

    fn table(&self) -> &'static str { "positions" }

    fn rows(&self) -> Vec<DictionaryRow> {
        vec![
            DictionaryRow::new("director", "Director", 1),
            DictionaryRow::new("manager", "Manager", 2),
            DictionaryRow::new("operator", "Operator", 3),
        ]
    }
}

/// Statuses a member can have during a shift.
#[derive(Debug, Default)]
pub struct ReplacementStatusesSeed;

impl SeedProvider for ReplacementStatusesSeed {
    fn name(&self) -> &'static str { "replacement_statuses" }

    fn table(&self) -> &'static str { "replacement_statuses" }

    fn rows(&self) -> Vec<DictionaryRow> {
        vec![
            DictionaryRow::coloured("offline", "Offline", 1, "#6c757d"),
            DictionaryRow::coloured("online", "Online", 2, "#198754"),
            DictionaryRow::coloured("break", "Break", 3, "#ffc107"),
            DictionaryRow::coloured("busy", "Busy", 4, "#dc3545"),
        ]
    }
}

/// Lifecycle of a booked break.
#[derive(Debug, Default)]
pub struct BreakStatusesSeed;

impl SeedProvider for BreakStatusesSeed {
    fn name(&self) -> &'static str { "break_statuses" }

    fn table(&self) -> &'static str { "break_statuses" }

    fn rows(&self) -> Vec<DictionaryRow> {
        vec![
            DictionaryRow::new("created", "Created", 1),
            DictionaryRow::new("started", "Started", 2),
            DictionaryRow::new("finished", "Finished", 3),
        ]
    }
}

/// All registered providers in insertion order.
#[must_use]
pub fn providers() -> Vec<Box<dyn SeedProvider>> {
    vec![
        Box::new(PositionsSeed),
        Box::new(ReplacementStatusesSeed),
        Box::new(BreakStatusesSeed),
    ]
}

/// Inserts the rows of one provider, skipping codes that already exist.
///
/// # Errors
///
/// Returns an error if a statement cannot be built or executed.
pub async fn run_seed<C>(db: &C, provider: &dyn SeedProvider) -> Result<SeedResult, AppError>
where
    C: ConnectionTrait,
{
    let started = Instant::now();
    let backend = db.get_database_backend();
    let table = Alias::new(provider.table());

    let mut inserted = 0;
    let mut skipped = 0;
    for row in provider.rows() {
        let mut columns = vec![
            Alias::new("code"),
            Alias::new("name"),
            Alias::new("sort"),
        ];
        let mut values: Vec<SimpleExpr> = vec![row.code.into(), row.name.into(), row.sort.into()];
        if let Some(color) = row.color {
            columns.push(Alias::new("color"));
            values.push(color.into());
        }

        let insert = Query::insert()
            .into_table(table.clone())
            .columns(columns)
            .values(values)
            .map_err(|e| AppError::migration(format!("Invalid seed row {}: {}", row.code, e)))?
            .on_conflict(OnConflict::column(Alias::new("code")).do_nothing().to_owned())
            .to_owned();

        let result = db.execute(backend.build(&insert)).await?;
        if result.rows_affected() == 0 {
            skipped += 1;
        }
        else {
            inserted += 1;
        }
    }

    let duration_ms = <u64 as std::convert::TryFrom<u128>>::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::debug!(
        seed = provider.name(),
        inserted,
        skipped,
        duration_ms,
        "Seed applied"
    );
    Ok(SeedResult::success(provider.name(), inserted, skipped, duration_ms))
}

/// Runs all registered seed providers
///
/// # Errors
///
/// Returns an error if any seed operation fails.
pub async fn run_all_seeds<C>(db: &C) -> Result<Vec<SeedResult>, AppError>
where
    C: ConnectionTrait,
{
    let mut results = Vec::new();
    for provider in providers() {
        results.push(run_seed(db, provider.as_ref()).await?);
    }

    let inserted: usize = results.iter().map(|r| r.inserted_count).sum();
    let rows: usize = results.iter().map(SeedResult::total).sum();
    tracing::info!(seeds = results.len(), rows, inserted, "Dictionary seeds applied");
    Ok(results)
}
