use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use trivia_api::db::{self, run_migrations};
use trivia_api::server::app::{run_server, AppState};
use trivia_api::settings::get_settings;
use trivia_api::telemetry::{init_tracing, Metrics};
use trivia_api::trivia::quiz::entropy_rng;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file, merged over the defaults
    #[clap(long, default_value = "configuration.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let settings = get_settings(&cli.config).context("Failed to load configuration")?;

    let pool = db::establish_connection(&settings.database)
        .await
        .with_context(|| format!("Cannot open database {}", settings.database.path))?;
    tracing::info!("Running db migrations...");
    run_migrations(&pool).await?;

    let state = AppState::new(pool, entropy_rng(), Metrics::new()?);
    run_server(state, &settings).await
}
