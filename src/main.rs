use anyhow::{Context, Result};
use api_client::{EnrichmentClient, SongDetailApi};
use catalog::SongService;
use clap::{Parser, Subcommand};
use configuration::{load_config, Settings};
use database::{connect, run_migrations, DbRepository, SongRepository};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use web_server::{run_server, AppState};

/// The main entry point for the song library service.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_config().context("Failed to load configuration")?;
    init_tracing(&settings.log_level)?;

    match cli.command.unwrap_or_default() {
        Commands::Serve(args) => handle_serve(args, settings).await?,
        Commands::Migrate => handle_migrate(settings).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A song catalog REST service backed by PostgreSQL.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Defaults to `serve` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and serve the REST API.
    Serve(ServeArgs),
    /// Apply pending database migrations and exit.
    Migrate,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve(ServeArgs::default())
    }
}

#[derive(Parser, Default)]
struct ServeArgs {
    /// Overrides `REST_PORT`.
    #[arg(long)]
    port: Option<u16>,
}

/// `RUST_LOG` wins; otherwise the configured level applies.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .with_context(|| format!("Invalid log level '{log_level}'"))?;
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, settings: Settings) -> Result<()> {
    let mut addr = settings.server.addr();
    if let Some(port) = args.port {
        addr.set_port(port);
    }

    let db_pool = connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    let repo: Arc<dyn SongRepository> = Arc::new(DbRepository::new(db_pool));
    let details: Arc<dyn SongDetailApi> = Arc::new(
        EnrichmentClient::new(&settings.enrichment)
            .context("Failed to build the enrichment client")?,
    );
    tracing::info!(
        enrichment_url = %settings.enrichment.base_url,
        "Song service ready."
    );

    let state = AppState::new(SongService::new(repo, details));
    run_server(addr, state).await
}

async fn handle_migrate(settings: Settings) -> Result<()> {
    let db_pool = connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations applied.");
    Ok(())
}
