//! HTTP server facade for MarkHub with Axum, error handling, the session
//! gate, and OpenAPI support.

use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Router};

use markhub_auth::SessionProvider;
use markhub_kernel::ModuleRegistry;

pub mod error;
pub mod gate;
pub mod router;

use gate::{session_gate, GateState};
use router::RouterBuilder;

/// Start the HTTP server with the given module registry
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &markhub_kernel::settings::Settings,
    provider: Arc<dyn SessionProvider>,
) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings, provider).context("failed to build HTTP router")?;

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router: API routes per module under `/api/{name}`,
/// page routes merged at the root behind the session gate.
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &markhub_kernel::settings::Settings,
    provider: Arc<dyn SessionProvider>,
) -> anyhow::Result<Router> {
    let mut router_builder = RouterBuilder::new();

    // Global middlewares
    router_builder = router_builder
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms);

    // Health check route
    router_builder = router_builder.route("/healthz", get(health_check));

    // Mount module API routes and collect page routes
    let mut pages = Router::new();
    for module in registry.modules() {
        let module_name = module.name();

        tracing::info!(
            module = module_name,
            "mounting module routes under /api/{}",
            module_name
        );
        router_builder = router_builder.mount_module(module_name, module.routes());
        pages = pages.merge(module.pages());
    }

    // Page navigation goes through the session gate; API routes do not.
    let gate_state = Arc::new(GateState {
        provider,
        cookie_name: settings.auth.cookie_name.clone(),
        session_ttl_secs: settings.auth.session_ttl_secs,
    });
    let pages = pages.layer(middleware::from_fn_with_state(gate_state, session_gate));
    router_builder = router_builder.mount_pages(pages);

    // OpenAPI documentation
    router_builder = router_builder.with_openapi(registry);

    Ok(router_builder.build())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
