//! FeatureLift CLI - job inspection tool
//!
//! Commands:
//! - `list` - List jobs known to the job service
//! - `get` - Show details of a single job
//! - `wait` - Poll a job until it reaches a terminal state

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::jobs;

/// FeatureLift CLI - job inspection tool
#[derive(Parser)]
#[command(name = "featurelift")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Feature store job inspection CLI", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FEATURELIFT_CONFIG")]
    config: Option<String>,

    /// Job service URL (overrides the config file)
    #[arg(long, env = "FEATURELIFT_JOB_SERVICE_URL")]
    job_service_url: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: String,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs known to the job service
    List {
        /// Include jobs that already completed or failed
        #[arg(long)]
        include_terminated: bool,

        /// Only show jobs for this feature table
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Show details of a single job
    Get {
        /// Job id
        id: String,
    },

    /// Poll a job until it reaches a terminal state
    Wait {
        /// Job id
        id: String,

        /// Seconds between status polls
        #[arg(long, default_value = "10")]
        poll_seconds: u64,

        /// Give up after this many seconds
        #[arg(long, default_value = "3600")]
        timeout_seconds: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let filter = match cli.verbose {
        0 => "warn,featurelift_client=info,featurelift_core=info",
        1 => "info,featurelift_client=debug,featurelift_core=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    // Load configuration
    let config = config::load(cli.config.as_deref(), cli.job_service_url.as_deref())?;

    // Execute command
    match cli.command {
        Commands::List {
            include_terminated,
            table,
        } => {
            jobs::list(&config, include_terminated, table.as_deref(), &cli.output).await?;
        }

        Commands::Get { id } => {
            jobs::get(&config, &id, &cli.output).await?;
        }

        Commands::Wait {
            id,
            poll_seconds,
            timeout_seconds,
        } => {
            jobs::wait(&config, &id, poll_seconds, timeout_seconds).await?;
        }
    }

    Ok(())
}
