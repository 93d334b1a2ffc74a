use std::{process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use tallyman::server::{
    config::Config,
    error::Error,
    model::pipeline::{RunOptions, RunOutcome},
    scheduler::Scheduler,
    startup,
    util::stop::{stop_channel, StopHandle},
};
use tracing_subscriber::EnvFilter;

/// Longest accepted `--days` lookback, about a century.
const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// Pull killmails from zKillboard for every active campaign.
#[derive(Parser, Debug)]
#[command(name = "tallyman", version, about)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline once
    Run {
        /// Ignore watermarks and fetch the last N days for every scope
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_LOOKBACK_DAYS))]
        days: Option<u32>,

        /// Clear a stale run lock before starting
        #[arg(long)]
        force: bool,
    },
    /// Clear the run lock and exit
    ClearLock,
    /// Run the pipeline and retention purge on their cron schedules until Ctrl-C
    Schedule,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!("tallyman={},warn", default_level))
            }),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match execute(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(command: Command, config: Config) -> Result<ExitCode, Error> {
    let db = startup::connect_to_database(&config).await?;

    match command {
        Command::Run { days, force } => {
            let orchestrator = startup::build_orchestrator(&config, db).await?;

            let (handle, stop) = stop_channel();
            stop_on_ctrl_c(handle);

            let options = RunOptions {
                lookback_days: days,
                force,
            };

            match orchestrator.run_once(options, stop).await? {
                RunOutcome::AlreadyRunning => {
                    println!("Another run holds the lock; nothing to do");
                    Ok(ExitCode::SUCCESS)
                }
                RunOutcome::Completed(summary) => {
                    println!("{}", summary);

                    if summary.is_total_failure() {
                        Ok(ExitCode::FAILURE)
                    } else {
                        Ok(ExitCode::SUCCESS)
                    }
                }
            }
        }
        Command::ClearLock => {
            let lock = startup::build_lock_coordinator(&config, &db).await?;

            if lock.force_clear(&config.pipeline.lock_name).await? {
                println!("Cleared lock \"{}\"", config.pipeline.lock_name);
            } else {
                println!("Lock \"{}\" was not held", config.pipeline.lock_name);
            }

            Ok(ExitCode::SUCCESS)
        }
        Command::Schedule => {
            let retention = startup::build_retention(&config, db.clone());
            let orchestrator = startup::build_orchestrator(&config, db).await?;

            let (handle, stop) = stop_channel();
            let mut scheduler =
                Scheduler::new(Arc::new(orchestrator), Arc::new(retention), stop).await?;
            scheduler.start(&config.ingest_cron).await?;

            wait_for_ctrl_c().await;
            tracing::info!("Shutting down scheduler");

            handle.stop();
            scheduler.shutdown().await?;

            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Stop the run at its next page boundary on the first Ctrl-C.
fn stop_on_ctrl_c(handle: StopHandle) {
    tokio::spawn(async move {
        wait_for_ctrl_c().await;
        tracing::warn!("Ctrl-C received, stopping after the current page");
        handle.stop();
    });
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
