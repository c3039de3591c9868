//! ballchasing.com API client.
//!
//! Wire types for the root (tier), `/replays` (search) and `/replays/{id}`
//! (detail) endpoints. All provider specifics are isolated in this module.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::fetch::{ApiClient, FetchError};
use crate::models::{ApiTier, Rank, ReplayId};

use super::provider::ReplayProvider;

// ── Response types ──────────────────────────────────────────────────────────

/// Body of the root endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TierResponse {
    #[serde(rename = "type")]
    pub tier: String,

    pub name: Option<String>,
}

/// One item of a search page.
///
/// Only `id` and `created` are read; every other field is kept so debug
/// dumps preserve the full item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub id: ReplayId,

    /// Upload timestamp, used as the pagination cursor
    pub created: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One page of `/replays` search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayPage {
    #[serde(default)]
    pub list: Vec<ReplaySummary>,

    /// Total matches reported by the provider
    pub count: Option<u64>,

    /// URL of the provider's own next page, unused by the cursor walk
    pub next: Option<String>,
}

/// A player entry inside a team roster.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerEntry {
    pub name: Option<String>,

    /// Category key -> (field name -> value)
    #[serde(default)]
    pub stats: BTreeMap<String, serde_json::Map<String, serde_json::Value>>,
}

/// One side of a match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamRoster {
    pub name: Option<String>,

    #[serde(default)]
    pub players: Vec<PlayerEntry>,
}

/// Full detail payload for one replay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayRecord {
    pub id: Option<String>,

    #[serde(default)]
    pub blue: TeamRoster,

    #[serde(default)]
    pub orange: TeamRoster,
}

impl ReplayRecord {
    /// Blue roster followed by orange roster.
    pub fn players(&self) -> impl Iterator<Item = &PlayerEntry> {
        self.blue.players.iter().chain(self.orange.players.iter())
    }
}

// ── Search query ────────────────────────────────────────────────────────────

/// Filters for one `/replays` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub min_rank: String,
    pub max_rank: String,
    pub playlist: String,
    pub created_after: String,
    pub created_before: String,
    pub count: u32,
}

impl SearchQuery {
    pub fn new(
        rank: Rank,
        playlist: &str,
        created_after: String,
        created_before: String,
        count: u32,
    ) -> Self {
        let range = rank.range();
        Self {
            min_rank: range.min.to_string(),
            max_rank: range.max.to_string(),
            playlist: playlist.to_string(),
            created_after,
            created_before,
            count,
        }
    }

    /// Query-string pairs in the provider's parameter names.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("min-rank", self.min_rank.clone()),
            ("max-rank", self.max_rank.clone()),
            ("playlist", self.playlist.clone()),
            ("created-after", self.created_after.clone()),
            ("created-before", self.created_before.clone()),
            ("count", self.count.to_string()),
        ]
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

/// ballchasing.com client.
pub struct BallchasingClient {
    api: ApiClient,
}

impl BallchasingClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ReplayProvider for BallchasingClient {
    fn name(&self) -> &'static str {
        "ballchasing"
    }

    async fn probe_tier(&self) -> Result<ApiTier, FetchError> {
        let url = self.api.url("")?;
        let response = self.api.get_raw(url).await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Tier probe returned HTTP {}, treating key as unauthenticated", status);
            return Ok(ApiTier::NoAuth);
        }

        let body: TierResponse = serde_json::from_str(&response.text().await?)?;
        if let Some(name) = &body.name {
            debug!("Authenticated as {}", name);
        }
        Ok(ApiTier::from_type(&body.tier))
    }

    async fn search_replays(&self, query: &SearchQuery) -> Result<ReplayPage, FetchError> {
        let mut url = self.api.url("replays")?;
        url.query_pairs_mut()
            .extend_pairs(query.to_pairs().iter().map(|(k, v)| (*k, v.as_str())));

        let page: ReplayPage = self.api.get_json(url).await?;
        info!(
            "ballchasing: page of {} replays before {}",
            page.list.len(),
            query.created_before
        );
        Ok(page)
    }

    async fn fetch_replay(&self, id: &ReplayId) -> Result<ReplayRecord, FetchError> {
        let url = self.api.url(&format!("replays/{}", id.as_str()))?;
        self.api.get_json(url).await
    }
}
