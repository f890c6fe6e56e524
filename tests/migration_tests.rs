//! Migration tests - verify that all migrations work correctly
//!
//! Tests cover:
//! - Applying all migrations (up)
//! - Rolling back all migrations (down)
//! - Verifying table structure, foreign keys and indexes

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, QueryResult, Statement};
use sea_orm_migration::MigratorTrait;

use bitebase::migrations::Migrator;

/// Fresh in-memory SQLite database without migrations applied
async fn create_sqlite_db() -> DatabaseConnection {
    Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create SQLite test database")
}

async fn migrated_db() -> DatabaseConnection {
    let db = create_sqlite_db().await;
    Migrator::up(&db, None)
        .await
        .expect("Failed to apply migrations");
    db
}

async fn query_names(db: &DatabaseConnection, sql: String, column: &str) -> Vec<String> {
    let result: Vec<QueryResult> = db
        .query_all(Statement::from_string(DbBackend::Sqlite, sql))
        .await
        .expect("Failed to query sqlite metadata");

    result
        .iter()
        .filter_map(|row| row.try_get::<String>("", column).ok())
        .collect()
}

async fn get_table_names(db: &DatabaseConnection) -> Vec<String> {
    query_names(
        db,
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE 'seaql_%' ORDER BY name".to_string(),
        "name",
    )
    .await
}

async fn get_table_columns(db: &DatabaseConnection, table: &str) -> Vec<String> {
    query_names(db, format!("PRAGMA table_info({})", table), "name").await
}

/// (from column, referenced table, referenced column)
async fn get_foreign_keys(db: &DatabaseConnection, table: &str) -> Vec<(String, String, String)> {
    let sql = format!("PRAGMA foreign_key_list({})", table);
    let result: Vec<QueryResult> = db
        .query_all(Statement::from_string(DbBackend::Sqlite, sql))
        .await
        .expect("Failed to query foreign keys");

    result
        .iter()
        .filter_map(|row| {
            let from: String = row.try_get("", "from").ok()?;
            let table: String = row.try_get("", "table").ok()?;
            let to: String = row.try_get("", "to").ok()?;
            Some((from, table, to))
        })
        .collect()
}

async fn get_indexes(db: &DatabaseConnection, table: &str) -> Vec<String> {
    query_names(
        db,
        format!(
            "SELECT name FROM sqlite_master WHERE type='index' AND tbl_name='{}' AND name NOT LIKE 'sqlite_%'",
            table
        ),
        "name",
    )
    .await
}

// =============================================================================
// Up / down
// =============================================================================

#[tokio::test]
async fn test_migrations_up_succeeds() {
    let db = create_sqlite_db().await;
    let result = Migrator::up(&db, None).await;
    assert!(
        result.is_ok(),
        "Migrations should apply successfully: {:?}",
        result.err()
    );
}

#[tokio::test]
async fn test_migrations_create_expected_tables() {
    let db = migrated_db().await;
    assert_eq!(
        get_table_names(&db).await,
        vec!["reports", "research_projects", "restaurant_profiles", "users"]
    );
}

#[tokio::test]
async fn test_migrations_down_drops_everything() {
    let db = migrated_db().await;

    let result = Migrator::down(&db, None).await;
    assert!(
        result.is_ok(),
        "Migrations should roll back successfully: {:?}",
        result.err()
    );
    assert!(get_table_names(&db).await.is_empty());
}

#[tokio::test]
async fn test_migrations_are_reapplicable() {
    let db = migrated_db().await;
    Migrator::down(&db, None).await.expect("down failed");
    Migrator::up(&db, None).await.expect("second up failed");
    assert_eq!(get_table_names(&db).await.len(), 4);
}

// =============================================================================
// Structure
// =============================================================================

#[tokio::test]
async fn test_research_projects_columns() {
    let db = migrated_db().await;
    let columns = get_table_columns(&db, "research_projects").await;

    for expected in [
        "id",
        "owner_id",
        "restaurant_profile_id",
        "name",
        "status",
        "progress",
        "competitive_analysis",
        "market_sizing",
        "demographic_analysis",
        "location_intelligence",
        "tourist_analysis",
        "local_competition",
        "pricing_strategy",
        "food_delivery_analysis",
        "results",
        "error_detail",
        "completed_at",
    ] {
        assert!(
            columns.iter().any(|c| c == expected),
            "research_projects is missing column {expected}"
        );
    }
}

#[tokio::test]
async fn test_foreign_keys() {
    let db = migrated_db().await;

    let profile_fks = get_foreign_keys(&db, "restaurant_profiles").await;
    assert!(profile_fks.contains(&("owner_id".into(), "users".into(), "id".into())));

    let project_fks = get_foreign_keys(&db, "research_projects").await;
    assert!(project_fks.contains(&("owner_id".into(), "users".into(), "id".into())));
    assert!(project_fks.contains(&(
        "restaurant_profile_id".into(),
        "restaurant_profiles".into(),
        "id".into()
    )));

    let report_fks = get_foreign_keys(&db, "reports").await;
    assert!(report_fks.contains(&(
        "research_project_id".into(),
        "research_projects".into(),
        "id".into()
    )));
}

#[tokio::test]
async fn test_indexes() {
    let db = migrated_db().await;

    let project_indexes = get_indexes(&db, "research_projects").await;
    assert!(project_indexes.contains(&"idx_research_projects_owner_id".to_string()));
    assert!(project_indexes.contains(&"idx_research_projects_status".to_string()));

    assert!(get_indexes(&db, "reports")
        .await
        .contains(&"idx_reports_research_project_id".to_string()));
    assert!(get_indexes(&db, "restaurant_profiles")
        .await
        .contains(&"idx_restaurant_profiles_owner_id".to_string()));
}
