//! Provider abstraction.
//!
//! The pipeline only talks to the statistics provider through
//! [`ReplayProvider`], so tests can swap in an in-memory provider.

use async_trait::async_trait;

use crate::fetch::FetchError;
use crate::models::{ApiTier, ReplayId};

use super::ballchasing::{ReplayPage, ReplayRecord, SearchQuery};

/// Trait for replay statistics providers.
#[async_trait]
pub trait ReplayProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Resolve the credential's rate-limit tier.
    ///
    /// A rejected probe yields [`ApiTier::NoAuth`] rather than an error.
    async fn probe_tier(&self) -> Result<ApiTier, FetchError>;

    /// Fetch one page of search results.
    async fn search_replays(&self, query: &SearchQuery) -> Result<ReplayPage, FetchError>;

    /// Fetch the full detail of one replay.
    async fn fetch_replay(&self, id: &ReplayId) -> Result<ReplayRecord, FetchError>;
}
