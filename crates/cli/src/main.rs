use anyhow::Context;
use clap::{Parser, Subcommand};

use markhub_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "markhub", about = "MarkHub bookmark manager", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Run pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load MarkHub settings")?;
    markhub_telemetry::init(&settings.telemetry);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(env = ?settings.environment, "starting server");
            markhub_app::run(settings).await
        }
        Command::Migrate => markhub_app::migrate(settings).await,
    }
}
