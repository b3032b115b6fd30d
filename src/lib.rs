//! MarkHub application library: module registration and server bootstrap.

pub mod modules;
pub mod state;

use std::sync::Arc;

use anyhow::Context;

use markhub_auth::{memory::MemorySessions, SessionProvider};
use markhub_kernel::{InitCtx, ModuleRegistry};
use markhub_kernel::settings::Settings;

use state::AppState;

/// Build the registry with every application module registered.
pub fn build_registry(state: &AppState) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, state);
    registry
}

/// Run the full application: connect storage, run migrations, start
/// modules, and serve until the listener fails.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let pool = markhub_db::connect(&settings.database)
        .await
        .context("failed to open database")?;

    // The managed identity backend would be wired here; local runs use the
    // in-memory provider.
    let provider: Arc<dyn SessionProvider> = Arc::new(MemorySessions::new());

    let state = AppState::new(
        pool.clone(),
        provider.clone(),
        settings.auth.cookie_name.clone(),
        settings.auth.session_ttl_secs,
    );
    let registry = build_registry(&state);

    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };

    registry.init_modules(&ctx).await?;
    markhub_db::run_migrations(&pool, &registry)
        .await
        .context("failed to run migrations")?;
    registry.start_modules(&ctx).await?;

    let serve_result = markhub_http::start_server(&registry, &settings, provider).await;

    registry.stop_modules().await?;
    serve_result
}

/// Connect storage and run every pending migration, without serving.
pub async fn migrate(settings: Settings) -> anyhow::Result<()> {
    let pool = markhub_db::connect(&settings.database)
        .await
        .context("failed to open database")?;
    let provider: Arc<dyn SessionProvider> = Arc::new(MemorySessions::new());
    let state = AppState::new(
        pool.clone(),
        provider,
        settings.auth.cookie_name.clone(),
        settings.auth.session_ttl_secs,
    );
    let registry = build_registry(&state);

    markhub_db::run_migrations(&pool, &registry)
        .await
        .context("failed to run migrations")?;

    tracing::info!("migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registry_holds_all_application_modules() {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        let provider: Arc<dyn SessionProvider> = Arc::new(MemorySessions::new());
        let state = AppState::new(pool, provider, "markhub_session".into(), 3600);

        let registry = build_registry(&state);
        assert!(registry.get_module("bookmarks").is_some());
        assert!(registry.get_module("auth").is_some());
        assert!(registry.get_module("pages").is_some());
    }

    #[tokio::test]
    async fn full_router_builds_from_the_registry() {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        let provider: Arc<dyn SessionProvider> = Arc::new(MemorySessions::new());
        let state = AppState::new(
            pool,
            provider.clone(),
            "markhub_session".into(),
            3600,
        );
        let registry = build_registry(&state);
        let settings = Settings::default();

        markhub_http::build_router(&registry, &settings, provider).unwrap();
    }
}
