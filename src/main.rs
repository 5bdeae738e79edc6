//! kinarow server entry point.

use anyhow::Result;
use clap::Parser;
use kinarow::auth::JwtKeys;
use kinarow::db::GameRepository;
use kinarow::{AppState, Cli, Command, PlayerService, SessionManager};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            db_path,
        } => serve(host, port, db_path).await,
        Command::Seed { db_path } => seed(db_path),
    }
}

async fn serve(host: String, port: u16, db_path: String) -> Result<()> {
    let repository = GameRepository::new(db_path);
    repository.run_migrations()?;

    let state = AppState::new(
        PlayerService::new(repository),
        SessionManager::new(),
        JwtKeys::from_env(),
    );
    let app = kinarow::router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(%host, port, "kinarow API listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn seed(db_path: String) -> Result<()> {
    let repository = GameRepository::new(db_path);
    repository.run_migrations()?;
    let created = kinarow::seed_guest_accounts(&repository)?;
    info!(created, "Seeding finished");
    Ok(())
}
