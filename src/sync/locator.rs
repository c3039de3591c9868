//! Replay discovery by cursor pagination.
//!
//! Walks the search endpoint backwards through time: each request's
//! `created-before` bound is the `created` timestamp of the last item of the
//! previous page. IDs are deduplicated after every page.

use tracing::{debug, info, warn};

use crate::fetch::FetchError;
use crate::models::{dedup_preserving_order, format_timestamp, DateWindow, Rank, ReplayId};

use super::ballchasing::{ReplaySummary, SearchQuery};
use super::provider::ReplayProvider;

/// Search settings that do not change between runs.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Playlist filter, e.g. `ranked-doubles`
    pub playlist: String,

    /// Items requested per page
    pub page_size: u32,

    /// Keep every raw page item for the debug dump
    pub keep_raw: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            playlist: "ranked-doubles".to_string(),
            page_size: 100,
            keep_raw: false,
        }
    }
}

/// Why pagination stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Enough distinct replays were collected
    TargetReached,
    /// The provider returned an empty page
    Exhausted,
    /// A page added nothing and the cursor did not move
    Stalled,
}

/// Result of a replay search.
#[derive(Debug, Clone)]
pub struct LocatedReplays {
    /// Distinct IDs in first-seen order
    pub ids: Vec<ReplayId>,

    /// Number of search requests made
    pub pages: usize,

    pub stop_reason: StopReason,

    /// Every item of every page, duplicates included (only when `keep_raw`)
    pub raw: Vec<ReplaySummary>,
}

/// Collects replay IDs for one rank and date window.
pub struct ReplayLocator<'a> {
    provider: &'a dyn ReplayProvider,
    config: LocatorConfig,
}

impl<'a> ReplayLocator<'a> {
    pub fn new(provider: &'a dyn ReplayProvider, config: LocatorConfig) -> Self {
        Self { provider, config }
    }

    /// Page through search results until at least `amount` distinct IDs are
    /// known or the provider runs out.
    ///
    /// Any failed page aborts the whole search.
    pub async fn locate(
        &self,
        rank: Rank,
        amount: usize,
        window: &DateWindow,
    ) -> Result<LocatedReplays, FetchError> {
        let created_after = format_timestamp(&window.from);
        let mut cursor = format_timestamp(&window.to);

        let mut ids: Vec<ReplayId> = Vec::new();
        let mut raw: Vec<ReplaySummary> = Vec::new();
        let mut pages = 0usize;
        let mut stop_reason = StopReason::TargetReached;

        info!(
            "Locating {} {} replays between {} and {}",
            amount, rank, created_after, cursor
        );

        while ids.len() < amount {
            let query = SearchQuery::new(
                rank,
                &self.config.playlist,
                created_after.clone(),
                cursor.clone(),
                self.config.page_size,
            );

            let page = self.provider.search_replays(&query).await?;
            pages += 1;

            let Some(last) = page.list.last() else {
                info!("No more replays after {} pages", pages);
                stop_reason = StopReason::Exhausted;
                break;
            };
            let next_cursor = last.created.clone();

            let known = ids.len();
            ids.extend(page.list.iter().map(|r| r.id.clone()));
            debug!("Replays before cull: {}", ids.len());
            ids = dedup_preserving_order(ids);
            info!("Replays after cull: {}", ids.len());

            if self.config.keep_raw {
                raw.extend(page.list);
            }

            if ids.len() == known && next_cursor == cursor {
                warn!("Pagination stalled at {}, stopping", cursor);
                stop_reason = StopReason::Stalled;
                break;
            }

            debug!("Cursor moved to {}", next_cursor);
            cursor = next_cursor;
        }

        Ok(LocatedReplays {
            ids,
            pages,
            stop_reason,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiTier;
    use crate::sync::provider::mock::{page_of, MockProvider};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn window() -> DateWindow {
        DateWindow::from_days(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    fn assert_unique(ids: &[ReplayId]) {
        let set: HashSet<&ReplayId> = ids.iter().collect();
        assert_eq!(set.len(), ids.len());
    }

    #[tokio::test]
    async fn test_two_pages_reach_target() {
        let provider = MockProvider::new(ApiTier::Regular)
            .with_page(page_of("a", 0, 100))
            .with_page(page_of("b", 0, 30))
            .with_page(page_of("c", 0, 100));
        let locator = ReplayLocator::new(&provider, LocatorConfig::default());

        let located = locator.locate(Rank::Gold, 120, &window()).await.unwrap();

        assert_eq!(located.ids.len(), 130);
        assert_eq!(located.pages, 2);
        assert_eq!(located.stop_reason, StopReason::TargetReached);
        assert_eq!(provider.queries().len(), 2);
        assert_unique(&located.ids);
    }

    #[tokio::test]
    async fn test_empty_page_ends_search() {
        let provider = MockProvider::new(ApiTier::Regular)
            .with_page(page_of("a", 0, 50))
            .with_page(page_of("a", 0, 0));
        let locator = ReplayLocator::new(&provider, LocatorConfig::default());

        let located = locator.locate(Rank::Gold, 1000, &window()).await.unwrap();

        assert_eq!(located.ids.len(), 50);
        assert_eq!(located.pages, 2);
        assert_eq!(located.stop_reason, StopReason::Exhausted);
    }

    #[tokio::test]
    async fn test_overlapping_pages_are_deduplicated() {
        let provider = MockProvider::new(ApiTier::Regular)
            .with_page(page_of("r", 0, 10))
            .with_page(page_of("r", 5, 10));
        let locator = ReplayLocator::new(&provider, LocatorConfig::default());

        let located = locator.locate(Rank::Silver, 12, &window()).await.unwrap();

        assert_eq!(located.ids.len(), 15);
        assert_unique(&located.ids);
        assert_eq!(located.ids[0].as_str(), "r0");
        assert_eq!(located.ids[14].as_str(), "r14");
    }

    #[tokio::test]
    async fn test_cursor_advances_to_last_created() {
        let first = page_of("a", 0, 3);
        let last_created = first.list[2].created.clone();
        let provider = MockProvider::new(ApiTier::Regular)
            .with_page(first)
            .with_page(page_of("b", 0, 3));
        let locator = ReplayLocator::new(&provider, LocatorConfig::default());

        locator.locate(Rank::Diamond, 5, &window()).await.unwrap();

        let queries = provider.queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].created_before, "2024-01-31T23:59:59.999999+00:00");
        assert_eq!(queries[1].created_before, last_created);
        assert_eq!(queries[0].created_after, queries[1].created_after);
        assert_eq!(queries[0].min_rank, "diamond-1");
        assert_eq!(queries[0].count, 100);
    }

    #[tokio::test]
    async fn test_failed_page_aborts() {
        let provider = MockProvider::new(ApiTier::Regular)
            .with_page(page_of("a", 0, 10))
            .with_failing_page();
        let locator = ReplayLocator::new(&provider, LocatorConfig::default());

        let result = locator.locate(Rank::Gold, 100, &window()).await;

        assert!(matches!(
            result,
            Err(FetchError::HttpStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_amount_makes_no_requests() {
        let provider = MockProvider::new(ApiTier::Regular).with_page(page_of("a", 0, 10));
        let locator = ReplayLocator::new(&provider, LocatorConfig::default());

        let located = locator.locate(Rank::Gold, 0, &window()).await.unwrap();

        assert!(located.ids.is_empty());
        assert!(provider.queries().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_page_stalls() {
        let provider = MockProvider::new(ApiTier::Regular)
            .with_page(page_of("a", 0, 10))
            .with_page(page_of("a", 0, 10))
            .with_page(page_of("a", 0, 10));
        let locator = ReplayLocator::new(&provider, LocatorConfig::default());

        let located = locator.locate(Rank::Gold, 100, &window()).await.unwrap();

        assert_eq!(located.ids.len(), 10);
        assert_eq!(located.pages, 2);
        assert_eq!(located.stop_reason, StopReason::Stalled);
    }

    #[tokio::test]
    async fn test_raw_items_kept_for_debug() {
        let provider = MockProvider::new(ApiTier::Regular)
            .with_page(page_of("r", 0, 10))
            .with_page(page_of("r", 5, 10));
        let config = LocatorConfig {
            keep_raw: true,
            ..Default::default()
        };
        let locator = ReplayLocator::new(&provider, config);

        let located = locator.locate(Rank::Gold, 12, &window()).await.unwrap();

        assert_eq!(located.raw.len(), 20);
        assert_eq!(located.ids.len(), 15);
    }

    #[tokio::test]
    async fn test_raw_items_dropped_by_default() {
        let provider = MockProvider::new(ApiTier::Regular).with_page(page_of("r", 0, 10));
        let locator = ReplayLocator::new(&provider, LocatorConfig::default());

        let located = locator.locate(Rank::Gold, 5, &window()).await.unwrap();

        assert!(located.raw.is_empty());
    }
}
