//! repair-desk: repair-order tracking server and maintenance commands

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use repair_desk::auth::hash_password;
use repair_desk::config::{AppConfig, StorageBackend};
use repair_desk::server::ServerBuilder;
use repair_desk::storage;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repair-desk")]
#[command(about = "Repair-order tracking for a device-repair shop", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// YAML config file (defaults to ./repair-desk.yaml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check the database: ensure the schema and print the number of orders
    VerifyDb {
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete every order and restart ids at 1
    ResetCounter {
        #[arg(long)]
        config: Option<PathBuf>,

        /// Confirm the irreversible deletion
        #[arg(long, default_value_t = false)]
        yes: bool,
    },

    /// Print an argon2 hash usable as ADMIN_PASSWORD_HASH
    HashPassword {
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repair_desk=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd.unwrap_or(Commands::Serve { config: None }) {
        Commands::Serve { config } => serve(config).await,
        Commands::VerifyDb { config } => verify_db(config).await,
        Commands::ResetCounter { config, yes } => reset_counter(config, yes).await,
        Commands::HashPassword { password } => {
            let hash = hash_password(&password)?;
            println!("{}", hash);
            Ok(())
        }
    }
}

async fn serve(config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).context("load configuration")?;
    tracing::info!(
        addr = %config.bind_addr(),
        backend = ?config.storage.backend,
        "starting repair-desk"
    );

    let store = storage::connect(&config.storage)
        .await
        .context("open order store")?;

    ServerBuilder::from_config(&config)?
        .with_store(store)
        .serve(&config.bind_addr())
        .await?;
    Ok(())
}

fn maintenance_config(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let config = AppConfig::load_unvalidated(config_path.as_deref()).context("load configuration")?;
    config.validate_storage()?;
    if config.storage.backend == StorageBackend::Memory {
        bail!("no database configured: set DATABASE_URL or storage.backend: postgres");
    }
    Ok(config)
}

async fn verify_db(config_path: Option<PathBuf>) -> Result<()> {
    let config = maintenance_config(config_path)?;
    let store = storage::connect(&config.storage)
        .await
        .context("connect to database")?;

    let count = store.count().await?;
    println!("database ok: {} orders in repair_orders", count);
    Ok(())
}

async fn reset_counter(config_path: Option<PathBuf>, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete every order without --yes");
    }

    let config = maintenance_config(config_path)?;
    let store = storage::connect(&config.storage)
        .await
        .context("connect to database")?;

    let before = store.count().await?;
    store.reset().await?;
    println!("deleted {} orders, ids restart at 1", before);
    Ok(())
}
