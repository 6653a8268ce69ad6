//! Database migrations
//!
//! Versioned SQLite schema for the concept graph, applied on connect.

use sqlx::SqlitePool;

/// Current schema version
pub const CURRENT_VERSION: i32 = 3;

const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version INTEGER PRIMARY KEY NOT NULL,
        applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

/// Migration 1: concepts and REQUIRES edges
const MIGRATION_V1: &str = r#"
    CREATE TABLE IF NOT EXISTS concepts (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        definition_md TEXT NOT NULL DEFAULT '',
        domain TEXT NOT NULL CHECK (domain IN ('MATH', 'PHYSICS', 'CHEMISTRY', 'BIOLOGY', 'CS')),
        subfield TEXT NOT NULL DEFAULT '',
        complexity_level INTEGER NOT NULL DEFAULT 1 CHECK (complexity_level >= 0),
        books TEXT NOT NULL DEFAULT '[]',
        papers TEXT NOT NULL DEFAULT '[]',
        articles TEXT NOT NULL DEFAULT '[]',
        related_concepts TEXT NOT NULL DEFAULT '[]',
        is_axiom INTEGER NOT NULL DEFAULT 0,
        is_verified INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CHECK (is_axiom = 0 OR complexity_level = 0)
    );

    CREATE INDEX IF NOT EXISTS idx_concepts_name ON concepts(name COLLATE NOCASE);
    CREATE INDEX IF NOT EXISTS idx_concepts_domain ON concepts(domain);

    -- dependent REQUIRES prerequisite
    CREATE TABLE IF NOT EXISTS requires (
        dependent_id TEXT NOT NULL REFERENCES concepts(id) ON DELETE CASCADE,
        prerequisite_id TEXT NOT NULL REFERENCES concepts(id) ON DELETE CASCADE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (dependent_id, prerequisite_id)
    );

    CREATE INDEX IF NOT EXISTS idx_requires_prerequisite ON requires(prerequisite_id);
"#;

/// Migration 2: complexity lookups used by the pass engines
const MIGRATION_V2: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_concepts_domain_complexity
        ON concepts(domain, complexity_level);
    CREATE INDEX IF NOT EXISTS idx_concepts_domain_axiom
        ON concepts(domain, is_axiom);
"#;

/// Migration 3: Unicode case-folded name key
///
/// SQLite's `NOCASE` only folds ASCII, so lookups go through a key column
/// written by the application. Existing rows are backfilled in Rust.
const MIGRATION_V3: &str = r#"
    ALTER TABLE concepts ADD COLUMN name_key TEXT NOT NULL DEFAULT '';
    CREATE INDEX IF NOT EXISTS idx_concepts_name_key ON concepts(name_key);
"#;

/// Lookup key for a concept name
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

async fn backfill_name_keys(pool: &SqlitePool) -> anyhow::Result<()> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT id, name FROM concepts")
        .fetch_all(pool)
        .await?;

    for (id, name) in &rows {
        sqlx::query("UPDATE concepts SET name_key = ? WHERE id = ?")
            .bind(name_key(name))
            .bind(id)
            .execute(pool)
            .await?;
    }
    tracing::debug!(rows = rows.len(), "Backfilled concept name keys");
    Ok(())
}

async fn get_current_version(pool: &SqlitePool) -> anyhow::Result<i32> {
    sqlx::raw_sql(CREATE_MIGRATIONS_TABLE).execute(pool).await?;

    let (version,): (i32,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM _migrations")
        .fetch_one(pool)
        .await?;

    Ok(version)
}

async fn record_migration(pool: &SqlitePool, version: i32) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO _migrations (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let current_version = get_current_version(pool).await?;

    tracing::info!(
        current_version = current_version,
        target_version = CURRENT_VERSION,
        "Checking database migrations"
    );

    if current_version >= CURRENT_VERSION {
        tracing::debug!("Database is up to date");
        return Ok(());
    }

    if current_version < 1 {
        tracing::info!("Applying migration v1: Concept graph schema");
        sqlx::raw_sql(MIGRATION_V1).execute(pool).await?;
        record_migration(pool, 1).await?;
    }

    if current_version < 2 {
        tracing::info!("Applying migration v2: Complexity indexes");
        sqlx::raw_sql(MIGRATION_V2).execute(pool).await?;
        record_migration(pool, 2).await?;
    }

    if current_version < 3 {
        tracing::info!("Applying migration v3: Case-folded name keys");
        sqlx::raw_sql(MIGRATION_V3).execute(pool).await?;
        backfill_name_keys(pool).await?;
        record_migration(pool, 3).await?;
    }

    tracing::info!("Database migrations completed");
    Ok(())
}

pub async fn migration_status(pool: &SqlitePool) -> anyhow::Result<MigrationStatus> {
    let current_version = get_current_version(pool).await?;
    Ok(MigrationStatus {
        current_version,
        target_version: CURRENT_VERSION,
        needs_migration: current_version < CURRENT_VERSION,
    })
}

#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub current_version: i32,
    pub target_version: i32,
    pub needs_migration: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test pool")
    }

    #[tokio::test]
    async fn test_run_migrations() {
        let pool = create_test_pool().await;

        let status = migration_status(&pool).await.unwrap();
        assert_eq!(status.current_version, 0);
        assert!(status.needs_migration);

        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let status = migration_status(&pool).await.unwrap();
        assert_eq!(status.current_version, CURRENT_VERSION);
        assert!(!status.needs_migration);
    }

    #[tokio::test]
    async fn test_axiom_check_constraint() {
        let pool = create_test_pool().await;
        run_migrations(&pool).await.unwrap();

        let bad = sqlx::query(
            "INSERT INTO concepts (id, name, domain, complexity_level, is_axiom) VALUES ('a', 'A', 'MATH', 2, 1)",
        )
        .execute(&pool)
        .await;
        assert!(bad.is_err());

        let negative = sqlx::query(
            "INSERT INTO concepts (id, name, domain, complexity_level) VALUES ('b', 'B', 'MATH', -1)",
        )
        .execute(&pool)
        .await;
        assert!(negative.is_err());

        sqlx::query(
            "INSERT INTO concepts (id, name, domain, complexity_level, is_axiom) VALUES ('c', 'C', 'MATH', 0, 1)",
        )
        .execute(&pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_requires_primary_key_merges() {
        let pool = create_test_pool().await;
        run_migrations(&pool).await.unwrap();

        for id in ["x", "y"] {
            sqlx::query("INSERT INTO concepts (id, name, domain) VALUES (?, ?, 'CS')")
                .bind(id)
                .bind(id.to_uppercase())
                .execute(&pool)
                .await
                .unwrap();
        }
        for _ in 0..2 {
            sqlx::query("INSERT OR IGNORE INTO requires (dependent_id, prerequisite_id) VALUES ('x', 'y')")
                .execute(&pool)
                .await
                .unwrap();
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM requires")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_name_keys_backfilled_from_v2() {
        let pool = create_test_pool().await;
        sqlx::raw_sql(CREATE_MIGRATIONS_TABLE).execute(&pool).await.unwrap();
        sqlx::raw_sql(MIGRATION_V1).execute(&pool).await.unwrap();
        sqlx::raw_sql(MIGRATION_V2).execute(&pool).await.unwrap();
        record_migration(&pool, 1).await.unwrap();
        record_migration(&pool, 2).await.unwrap();

        sqlx::query("INSERT INTO concepts (id, name, domain) VALUES ('e', 'Étale Morphism', 'MATH')")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool).await.unwrap();

        let (key,): (String,) = sqlx::query_as("SELECT name_key FROM concepts WHERE id = 'e'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(key, "étale morphism");
        assert_eq!(name_key("  ΩMEGA Category "), "ωmega category");
    }
}
