//! LifeShare server: blood and plasma donation coordination.
//!
//! Main entry point that wires all crates together and runs the chosen command.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use lifeshare_api::AppState;
use lifeshare_core::config::AppConfig;
use lifeshare_core::error::AppError;
use lifeshare_core::traits::Mailer;
use lifeshare_database::{DatabasePool, Repositories};
use lifeshare_entity::inventory::InventoryKind;
use lifeshare_mail::MailerManager;
use lifeshare_service::Services;
use lifeshare_worker::jobs::default_executor;
use lifeshare_worker::{CronScheduler, JobExecutor, Trigger};

#[derive(Debug, Parser)]
#[command(name = "lifeshare-server", version, about = "LifeShare donation coordination server")]
struct Cli {
    /// Configuration overlay to load from `config/{env}.toml`
    #[arg(long, env = "LIFESHARE_ENV", default_value = "development")]
    env: String,

    /// Directory holding the configuration files
    #[arg(long, default_value = "config")]
    config_dir: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API and the scheduled sweeps (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Run one sweep now and print its report
    Trigger {
        #[command(subcommand)]
        sweep: SweepCommand,
    },
}

#[derive(Debug, Subcommand)]
enum SweepCommand {
    /// Remind donors who are eligible to give again
    Reminders,
    /// Warn hospital staff about stock nearing expiry
    Expiry {
        /// `blood` or `plasma`; both when omitted
        #[arg(long)]
        kind: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load_from(&cli.config_dir, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %cli.env, "Configuration loaded");

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => migrate(config).await,
        Command::Trigger { sweep } => trigger(config, sweep).await,
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Stores, services and the job executor, built once per command.
async fn bootstrap(config: &AppConfig) -> Result<(Repositories, Services, Arc<JobExecutor>), AppError> {
    let repos = Repositories::from_config(&config.database).await?;
    let mailer: Arc<dyn Mailer> = Arc::new(MailerManager::new(&config.mail)?);
    tracing::info!(provider = mailer.provider_name(), "Mail provider ready");

    let services = Services::new(&repos, mailer, config);
    let executor = Arc::new(default_executor(&services));
    Ok((repos, services, executor))
}

async fn serve(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LifeShare v{}", env!("CARGO_PKG_VERSION"));

    let (repos, services, executor) = bootstrap(&config).await?;

    let scheduler = if config.scheduler.enabled {
        let scheduler = CronScheduler::new(Arc::clone(&executor), config.scheduler.clone()).await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Scheduler disabled");
        None
    };

    let state = AppState::new(config, repos.clone(), services, executor);
    let served = lifeshare_api::run_server(state).await;

    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }
    repos.close().await;
    tracing::info!("LifeShare stopped");

    served
}

async fn migrate(config: AppConfig) -> Result<(), AppError> {
    if config.database.provider != "postgres" {
        return Err(AppError::configuration(
            "Migrations require database.provider = \"postgres\"",
        ));
    }

    let db = DatabasePool::connect(&config.database).await?;
    lifeshare_database::migration::run_migrations(db.pool()).await?;
    db.close().await;
    tracing::info!("Database migrations complete");
    Ok(())
}

async fn trigger(config: AppConfig, sweep: SweepCommand) -> Result<(), AppError> {
    let trigger = match sweep {
        SweepCommand::Reminders => Trigger::DonorReminders,
        SweepCommand::Expiry { kind } => {
            Trigger::Expiry(kind.as_deref().map(str::parse::<InventoryKind>).transpose()?)
        }
    };

    let (repos, _services, executor) = bootstrap(&config).await?;
    let report = executor
        .trigger(trigger)
        .await
        .map_err(|e| AppError::internal(format!("Sweep failed: {e}")))?;
    repos.close().await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
