//! Sync orchestrator.
//!
//! Coordinates one baseline run:
//! 1. Probe the credential's rate-limit tier
//! 2. Locate replay IDs for the rank and date window
//! 3. Extract per-player statistics from every replay
//! 4. Aggregate means and write one file per category

pub mod ballchasing;
pub mod extract;
pub mod locator;
pub mod provider;

pub use ballchasing::BallchasingClient;
pub use extract::{extract_replay, tables_from_record};
pub use locator::{LocatedReplays, LocatorConfig, ReplayLocator, StopReason};
pub use provider::ReplayProvider;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::calculate::aggregate_all;
use crate::fetch::FetchError;
use crate::models::{merge_tables, ApiTier, CategoryTables, DateWindow, Rank, ReplayId};
use crate::storage::{write_debug_replays, write_means, StorageConfig, StorageError};

const FETCH_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} replays";
const WRITE_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files written";

/// Errors that can occur during sync.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("API key not found: set {0} in the environment or .env")]
    MissingCredential(String),

    #[error("Invalid date window: {0}")]
    InvalidWindow(String),

    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Read the API key from `var`. An empty value counts as missing.
pub fn api_key_from_env(var: &str) -> Result<String, SyncError> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(SyncError::MissingCredential(var.to_string())),
    }
}

/// Probe the tier and report it.
pub async fn probe_tier(provider: &dyn ReplayProvider) -> Result<ApiTier, FetchError> {
    let tier = provider.probe_tier().await?;
    info!("Rate limited to {} tier", tier);
    Ok(tier)
}

/// Configuration for one baseline run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub rank: Rank,

    /// Distinct replays to collect
    pub amount: usize,

    pub window: DateWindow,

    /// Persist raw search results next to the means
    pub debug: bool,

    /// Worker pool size for elevated tiers
    pub workers: usize,

    pub locator: LocatorConfig,

    pub storage: StorageConfig,

    /// Draw progress bars on stderr
    pub show_progress: bool,
}

/// Result of a sync run.
#[derive(Debug, Clone)]
pub struct SyncResult {
    pub tier: ApiTier,
    pub replays_found: usize,
    pub replays_processed: usize,
    pub observations: usize,
    pub output_dir: PathBuf,
    pub files_written: Vec<PathBuf>,
    pub debug_file: Option<PathBuf>,
    pub duration: Duration,
}

/// Sync orchestrator.
pub struct SyncOrchestrator {
    config: SyncConfig,
    provider: Arc<dyn ReplayProvider>,
}

impl SyncOrchestrator {
    /// Create a new sync orchestrator.
    pub fn new(config: SyncConfig, provider: Arc<dyn ReplayProvider>) -> Self {
        Self { config, provider }
    }

    /// Run the whole pipeline once. Any fetch failure aborts the run
    /// before the run directory is created.
    pub async fn run(&self) -> Result<SyncResult, SyncError> {
        let start = Instant::now();
        let config = &self.config;
        info!(
            "Starting {} run via {} for {} replays",
            config.rank,
            self.provider.name(),
            config.amount
        );

        let tier = probe_tier(self.provider.as_ref()).await?;

        let mut locator_config = config.locator.clone();
        locator_config.keep_raw = config.debug;
        let located = ReplayLocator::new(self.provider.as_ref(), locator_config)
            .locate(config.rank, config.amount, &config.window)
            .await?;

        info!("Processing {} replays...", located.ids.len());
        let (tables, processed) = if tier.is_elevated() {
            self.extract_concurrent(&located.ids).await?
        } else {
            self.extract_sequential(&located.ids).await?
        };

        // Nothing touches the disk until every replay is in.
        let output_dir = config.storage.ensure_run_dir(config.rank, &config.window)?;
        let debug_file = if config.debug {
            Some(write_debug_replays(&output_dir, &located.raw)?)
        } else {
            None
        };

        info!("Writing CSV data to {:?}...", output_dir);
        let rows = aggregate_all(&tables);
        let pb = self.progress_bar(rows.len(), WRITE_TEMPLATE);
        let mut files_written = Vec::with_capacity(rows.len());
        for row in &rows {
            files_written.push(write_means(&output_dir, row)?);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let duration = start.elapsed();
        info!(
            "Run completed: {} replays, {} observations in {:?}",
            processed,
            tables.total_rows(),
            duration
        );

        Ok(SyncResult {
            tier,
            replays_found: located.ids.len(),
            replays_processed: processed,
            observations: tables.total_rows(),
            output_dir,
            files_written,
            debug_file,
            duration,
        })
    }

    /// Fetch and merge replays one at a time.
    /// Returns the merged tables and the number of replays merged.
    async fn extract_sequential(
        &self,
        ids: &[ReplayId],
    ) -> Result<(CategoryTables, usize), SyncError> {
        let pb = self.progress_bar(ids.len(), FETCH_TEMPLATE);
        let mut tables = CategoryTables::new();
        let mut merged = 0;

        for id in ids {
            let replay = extract_replay(self.provider.as_ref(), id).await?;
            tables.merge(replay);
            merged += 1;
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok((tables, merged))
    }

    /// Fetch replays on a fixed pool of workers, then merge the results
    /// here in input order.
    async fn extract_concurrent(
        &self,
        ids: &[ReplayId],
    ) -> Result<(CategoryTables, usize), SyncError> {
        let workers = self.config.workers.clamp(1, ids.len().max(1));
        info!("Fetching replays on {} workers", workers);

        let pb = self.progress_bar(ids.len(), FETCH_TEMPLATE);
        let queue: Arc<Mutex<VecDeque<(usize, ReplayId)>>> =
            Arc::new(Mutex::new(ids.iter().cloned().enumerate().collect()));

        let mut set = JoinSet::new();
        for worker in 0..workers {
            let queue = Arc::clone(&queue);
            let provider = Arc::clone(&self.provider);
            let pb = pb.clone();

            set.spawn(async move {
                let mut done: Vec<(usize, CategoryTables)> = Vec::new();
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some((idx, id)) = next else {
                        break;
                    };
                    let tables = extract_replay(provider.as_ref(), &id).await?;
                    pb.inc(1);
                    done.push((idx, tables));
                }
                debug!("Worker {} finished {} replays", worker, done.len());
                Ok::<_, FetchError>(done)
            });
        }

        let mut slots: Vec<Option<CategoryTables>> = (0..ids.len()).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            let done = joined.map_err(|e| SyncError::Worker(e.to_string()))??;
            for (idx, tables) in done {
                slots[idx] = Some(tables);
            }
        }

        pb.finish_and_clear();
        let done: Vec<CategoryTables> = slots.into_iter().flatten().collect();
        let merged = done.len();
        Ok((merge_tables(done), merged))
    }

    fn progress_bar(&self, len: usize, template: &str) -> ProgressBar {
        let pb = ProgressBar::new(len as u64);
        if self.config.show_progress {
            let style = ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
        } else {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb
    }
}
