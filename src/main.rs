mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use superliga_core::api::VolleyballWorldClient;
use superliga_core::config::Settings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "superliga")]
#[command(about = "Keep Volleyball World Superliga schedules in local .ics calendars")]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch new matches and update competition calendars
    Sync {
        /// Discover and plan only, without fetching schedules or writing files
        #[arg(long)]
        dry_run: bool,

        /// Skip the selection prompt and only update calendars that already exist
        #[arg(long)]
        update_existing: bool,

        /// Replace stored events when the fetched copy differs
        #[arg(long)]
        refresh: bool,

        /// Offer every discovered competition, not only the active ones
        #[arg(long, conflicts_with = "update_existing")]
        all: bool,

        /// Year of the competitions listing (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// List the competitions found in the listing
    Competitions {
        /// Year of the competitions listing (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load()?;
    let client = VolleyballWorldClient::new(settings.api_config(), settings.retry_policy())?;

    match cli.command {
        Commands::Sync {
            dry_run,
            update_existing,
            refresh,
            all,
            year,
        } => {
            let args = commands::sync::SyncArgs {
                dry_run,
                update_existing,
                refresh,
                all,
                year,
            };
            commands::sync::run(&client, &settings, args).await
        }
        Commands::Competitions { year } => {
            commands::competitions::run(&client, &settings, year).await
        }
    }
}
