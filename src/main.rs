use anyhow::Context;
use markhub_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load MarkHub settings")?;

    markhub_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "markhub-app starting"
    );

    markhub_app::run(settings).await
}
