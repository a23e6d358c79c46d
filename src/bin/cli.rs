use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trivia_api::db::{self, run_migrations};
use trivia_api::seed::{export_data, import_data};
use trivia_api::settings::DatabaseSettings;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv to a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let pool = db::establish_connection(&DatabaseSettings {
        path: cli.db_path.display().to_string(),
        max_connections: 1,
    })
    .await?;
    run_migrations(&pool).await?;
    match cli.command {
        Commands::Export { path } => export_data(&pool, &path).await?,
        Commands::Import { path } => import_data(&pool, &path).await?,
    }
    Ok(())
}
