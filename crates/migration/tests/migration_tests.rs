//! Runs the full migration set against an in-memory SQLite database.

use migration::{seeds, Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

async fn fresh_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            format!("SELECT COUNT(*) AS n FROM {}", table),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn test_up_creates_and_seeds_dictionaries() {
    let db = fresh_db().await;

    assert_eq!(count(&db, "positions").await, 3);
    assert_eq!(count(&db, "replacement_statuses").await, 4);
    assert_eq!(count(&db, "break_statuses").await, 3);
    assert_eq!(count(&db, "replacements").await, 0);
}

#[tokio::test]
async fn test_seeds_are_idempotent() {
    let db = fresh_db().await;

    let results = seeds::run_all_seeds(&db).await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.inserted_count == 0 && r.skipped_count == r.total()));
    assert_eq!(results.iter().map(|r| r.skipped_count).sum::<usize>(), 10);
    assert_eq!(count(&db, "positions").await, 3);
}

#[tokio::test]
async fn test_down_drops_everything() {
    let db = fresh_db().await;
    Migrator::down(&db, None).await.unwrap();

    let status = Migrator::get_pending_migrations(&db).await.unwrap();
    assert_eq!(status.len(), 6);
}

#[tokio::test]
async fn test_schema_defaults_and_unique_keys() {
    let db = fresh_db().await;

    db.execute_unprepared(
        "INSERT INTO users (email, password_hash, first_name, last_name) VALUES ('dana@example.com', 'x', 'Dana', 'Director')",
    )
    .await
    .unwrap();
    db.execute_unprepared("INSERT INTO organisations (name, director_id) VALUES ('Call Centre', 1)")
        .await
        .unwrap();
    db.execute_unprepared("INSERT INTO employees (organisation_id, user_id, date_joined) VALUES (1, 1, '2026-10-01')")
        .await
        .unwrap();

    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT position, (SELECT is_active FROM users WHERE id = 1) AS active FROM employees WHERE id = 1",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<String>("", "position").unwrap(), "operator");
    assert!(row.try_get::<bool>("", "active").unwrap());

    let duplicate = db
        .execute_unprepared("INSERT INTO employees (organisation_id, user_id, date_joined) VALUES (1, 1, '2026-10-02')")
        .await;
    assert!(duplicate.is_err());

    let same_email = db
        .execute_unprepared(
            "INSERT INTO users (email, password_hash, first_name, last_name) VALUES ('dana@example.com', 'y', 'Dan', 'Other')",
        )
        .await;
    assert!(same_email.is_err());
    assert_eq!(count(&db, "employees").await, 1);
}
