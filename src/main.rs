//! episode-tracker - Episode polling and reconciliation
//!
//! One invocation is one polling run: fetch every configured source,
//! reconcile against Todoist and the seen store, announce new episodes
//! on Telegram, exit. Scheduling across runs belongs to cron or a
//! systemd timer, not to this binary.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use episode_tracker::config::{load_sources, Settings};
use episode_tracker::{show, App};

/// Command-line arguments for episode-tracker
#[derive(Parser, Debug)]
#[command(name = "episode-tracker")]
#[command(about = "Polls episode sources and reconciles them into Todoist tasks")]
#[command(version)]
struct Args {
    /// Log what would be written without calling any external service
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-process one source from scratch, treating every episode as new
    UpdateSingleSource {
        /// Source name exactly as it appears in the catalog
        source_name: String,
    },
    /// Print the configured source catalog as JSON
    PrintSources,
    /// Print the configured source names as JSON
    PrintSourceNames,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    let sources = load_sources()?;

    // The show subcommands dump JSON to stdout, so they run before any
    // tracing output can get mixed into it.
    match &args.command {
        Some(Command::PrintSources) => {
            show::print_sources(&sources)?;
            return Ok(());
        }
        Some(Command::PrintSourceNames) => {
            show::print_source_names(&sources)?;
            return Ok(());
        }
        _ => {}
    }

    init_tracing(&settings);
    info!(
        "Starting episode-tracker v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let entire_source = match &args.command {
        Some(Command::UpdateSingleSource { source_name }) => Some(source_name.as_str()),
        _ => None,
    };

    App::connect_and_run(&settings, sources, entire_source, args.dry_run).await?;

    info!("Run complete");
    Ok(())
}

/// Initialize tracing from the configured level, letting RUST_LOG
/// override it when set
fn init_tracing(settings: &Settings) {
    let default_filter = format!("episode_tracker={}", settings.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
