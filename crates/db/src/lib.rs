//! SQLite connection pooling and module migration execution.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use markhub_kernel::settings::DatabaseSettings;
use markhub_kernel::ModuleRegistry;

/// Open a connection pool against the configured database.
///
/// Handlers acquire connections from this pool per request; no connection
/// outlives the request that borrowed it.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    tracing::info!(url = %settings.url, "opening database pool");

    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to database at '{}'", settings.url))?;

    Ok(pool)
}

/// Run every pending module migration, recording applied ones in a ledger
/// table so reruns are no-ops.
pub async fn run_migrations(pool: &SqlitePool, registry: &ModuleRegistry) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            module     TEXT NOT NULL,
            id         TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (module, id)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create migrations ledger")?;

    for (module, migration) in registry.collect_migrations() {
        let already_applied: Option<(String,)> =
            sqlx::query_as("SELECT id FROM _migrations WHERE module = ? AND id = ?")
                .bind(&module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .context("failed to read migrations ledger")?;

        if already_applied.is_some() {
            tracing::debug!(module = %module, id = migration.id, "migration already applied");
            continue;
        }

        tracing::info!(module = %module, id = migration.id, "applying migration");

        let mut tx = pool.begin().await.context("failed to begin migration")?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;

        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(&module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .context("failed to record migration")?;

        tx.commit().await.context("failed to commit migration")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use markhub_kernel::{Migration, Module};
    use std::sync::Arc;

    struct FixtureModule;

    #[async_trait::async_trait]
    impl Module for FixtureModule {
        fn name(&self) -> &'static str {
            "fixture"
        }

        fn migrations(&self) -> Vec<Migration> {
            vec![Migration {
                id: "001_init",
                up: "CREATE TABLE fixture (id TEXT PRIMARY KEY, label TEXT NOT NULL);",
            }]
        }
    }

    #[tokio::test]
    async fn migrations_apply_once() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(FixtureModule));

        run_migrations(&pool, &registry).await.unwrap();
        // A second run must not fail on the already-created table.
        run_migrations(&pool, &registry).await.unwrap();

        let applied: Vec<(String, String)> =
            sqlx::query_as("SELECT module, id FROM _migrations")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(applied, vec![("fixture".to_string(), "001_init".to_string())]);
    }
}
