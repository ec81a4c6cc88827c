use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::core::{GameCandidate, IntersectResponse, RankedList, SteamUser};
use crate::error::{EngineError, Result};
use crate::providers::{CatalogProvider, FriendsProvider, LibraryProvider};
use crate::ranking::{Ranker, RankingContext, TierRanker};
use crate::timeout::with_timeout;

/// Intersects the libraries of a group of users and ranks the shared games
pub struct CoplayEngine {
    library: Arc<dyn LibraryProvider>,
    catalog: Arc<dyn CatalogProvider>,
    friends: Option<Arc<dyn FriendsProvider>>,
    ranker: Arc<dyn Ranker>,
    config: EngineConfig,
}

impl CoplayEngine {
    /// Create a new engine with the default tier ranker
    pub fn new(
        library: Arc<dyn LibraryProvider>,
        catalog: Arc<dyn CatalogProvider>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            library,
            catalog,
            friends: None,
            ranker: Arc::new(TierRanker::new()),
            config,
        })
    }

    /// Replace the ranker
    pub fn with_ranker(mut self, ranker: Arc<dyn Ranker>) -> Self {
        self.ranker = ranker;
        self
    }

    /// Attach a friend list source
    pub fn with_friends(mut self, friends: Arc<dyn FriendsProvider>) -> Self {
        self.friends = Some(friends);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Deduplicate and bounds-check the requested users
    fn validate_group(&self, users: &[u64]) -> Result<BTreeSet<u64>> {
        let group: BTreeSet<u64> = users.iter().copied().collect();

        if group.len() < self.config.min_group_size || group.len() > self.config.max_group_size {
            return Err(EngineError::InvalidGroup {
                size: group.len(),
                min: self.config.min_group_size,
                max: self.config.max_group_size,
            });
        }

        Ok(group)
    }

    /// Friend list of `steam_id`, unfiltered and in provider order
    pub async fn friends(&self, steam_id: u64) -> Result<Vec<SteamUser>> {
        let provider = self
            .friends
            .as_ref()
            .ok_or_else(|| EngineError::Config("no friend list provider attached".to_string()))?;

        let friends = with_timeout(
            &format!("{} friend list fetch for {}", provider.name(), steam_id),
            self.config.friends_timeout(),
            provider.friends(steam_id),
        )
        .await?;

        tracing::debug!("Fetched {} friends for {}", friends.len(), steam_id);
        Ok(friends)
    }

    /// App ids owned by every user, ascending.
    pub async fn intersect(&self, users: &[u64], include_free_games: bool) -> Result<Vec<u64>> {
        let group = self.validate_group(users)?;
        let limit = self.config.library_timeout();

        let mut shared: Option<HashSet<u64>> = None;

        for &steam_id in &group {
            let owned = with_timeout(
                &format!("{} library fetch for {}", self.library.name(), steam_id),
                limit,
                self.library.owned_games(steam_id, include_free_games),
            )
            .await?;

            if owned.is_empty() {
                return Err(EngineError::EmptyLibrary(steam_id));
            }

            let next = match shared {
                None => owned,
                Some(current) => current.intersection(&owned).copied().collect(),
            };

            if next.is_empty() {
                tracing::debug!("No common games left after user {}", steam_id);
                return Ok(Vec::new());
            }
            shared = Some(next);
        }

        let mut app_ids: Vec<u64> = shared.unwrap_or_default().into_iter().collect();
        app_ids.sort_unstable();
        Ok(app_ids)
    }

    /// Shared games with catalog metadata, in catalog order
    pub async fn shared_games(&self, users: &[u64], include_free_games: bool) -> Result<Vec<GameCandidate>> {
        let app_ids = self.intersect(users, include_free_games).await?;
        if app_ids.is_empty() {
            return Ok(Vec::new());
        }

        with_timeout(
            &format!("{} catalog lookup", self.catalog.name()),
            self.config.library_timeout(),
            self.catalog.game_info(&app_ids),
        )
        .await
    }

    /// Intersect and rank for display
    pub async fn compare(&self, users: &[u64], include_free_games: bool) -> Result<RankedList> {
        let start = Instant::now();

        let group_size = self.validate_group(users)?.len();
        let games = self.shared_games(users, include_free_games).await?;
        let list = self.ranker.rank(games, RankingContext::new(group_size));

        tracing::info!(
            "✅ {} ({:.2}ms)",
            list.display(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(list)
    }

    /// Intersect and encode the outcome as the wire payload. Never fails.
    pub async fn respond(&self, users: &[u64], include_free_games: bool) -> IntersectResponse {
        match self.shared_games(users, include_free_games).await {
            Ok(games) => IntersectResponse::success(games),
            Err(e) => {
                tracing::warn!("Intersect for {:?} failed: {}", users, e);
                IntersectResponse::from(e)
            }
        }
    }
}
