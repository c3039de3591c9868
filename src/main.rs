use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rank_baseline::config::AppConfig;
use rank_baseline::fetch::ApiClient;
use rank_baseline::models::{parse_day, DateWindow, Rank};
use rank_baseline::storage::StorageConfig;
use rank_baseline::sync::{
    api_key_from_env, probe_tier, BallchasingClient, ReplayProvider, SyncConfig, SyncError,
    SyncOrchestrator,
};

#[derive(Parser)]
#[command(name = "rank-baseline")]
#[command(about = "Mean player statistics per rank from ballchasing.com replays")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Hide progress bars
    #[arg(long, short)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect replays and write per-category means
    Run {
        /// Rank ordinal, 1 (Bronze) to 7 (Grand Champion)
        #[arg(long, default_value = "7", value_parser = clap::value_parser!(u8).range(1..=7))]
        rank: u8,

        /// Number of distinct replays to sample
        #[arg(long, default_value = "100")]
        replays: usize,

        /// First day of the window (YYYY-MM-DD, UTC)
        #[arg(long, value_parser = parse_day_arg)]
        from: NaiveDate,

        /// Last day of the window (YYYY-MM-DD, UTC)
        #[arg(long, value_parser = parse_day_arg)]
        to: NaiveDate,

        /// Also save the raw search results to replays.json
        #[arg(long)]
        debug: bool,

        /// Override the output root from the config file
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Print the API tier of the configured key
    Tier,
}

fn parse_day_arg(s: &str) -> Result<NaiveDate, String> {
    parse_day(s).ok_or_else(|| format!("expected YYYY-MM-DD, got '{}'", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    // Initialize tracing
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| app_config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting rank-baseline v{}", env!("CARGO_PKG_VERSION"));

    if dotenvy::dotenv().is_ok() {
        tracing::debug!("Loaded environment from .env");
    }
    let api_key = api_key_from_env(&app_config.api.api_key_env)?;
    let client = ApiClient::new(app_config.api.client_config(), &api_key)?;
    let provider: Arc<dyn ReplayProvider> = Arc::new(BallchasingClient::new(client));

    match cli.command {
        Commands::Run {
            rank,
            replays,
            from,
            to,
            debug,
            output_dir,
        } => {
            let rank = Rank::from_ordinal(rank).context("Rank must be between 1 and 7")?;
            let window = DateWindow::from_days(from, to).ok_or_else(|| {
                SyncError::InvalidWindow(format!("--from {} is after --to {}", from, to))
            })?;

            let storage = StorageConfig::new(
                output_dir.unwrap_or_else(|| app_config.output_dir.clone()),
            );

            let sync_config = SyncConfig {
                rank,
                amount: replays,
                window,
                debug,
                workers: app_config.api.workers,
                locator: app_config.api.locator_config(debug),
                storage,
                show_progress: !cli.quiet,
            };

            let orchestrator = SyncOrchestrator::new(sync_config, provider);
            let result = orchestrator.run().await?;

            println!("\n=== Baseline Results ===");
            println!("API tier:         {}", result.tier);
            println!("Replays:          {}", result.replays_processed);
            println!("Observations:     {}", result.observations);
            println!("Output:           {}", result.output_dir.display());
            for file in &result.files_written {
                println!("  {}", file.display());
            }
            if let Some(debug_file) = &result.debug_file {
                println!("Raw results:      {}", debug_file.display());
            }
            println!("Duration:         {:.1?}", result.duration);
        }

        Commands::Tier => {
            let tier = probe_tier(provider.as_ref()).await?;
            println!("{}", tier);
        }
    }

    Ok(())
}
