pub mod memory;

use async_trait::async_trait;
use std::collections::HashSet;

use crate::core::{GameCandidate, SteamUser};
use crate::error::Result;

pub use memory::{Fixture, MemoryCatalog, MemoryFriends, MemoryLibrary};

/// Source of the games each user owns
#[async_trait]
pub trait LibraryProvider: Send + Sync {
    /// App ids owned by `steam_id`. With `include_free_games`, free games
    /// the user has played count as owned.
    ///
    /// Fails with `EngineError::PrivateLibrary` when the list is not visible.
    async fn owned_games(&self, steam_id: u64, include_free_games: bool) -> Result<HashSet<u64>>;

    /// Get provider name
    fn name(&self) -> &str;
}

/// Source of display metadata for app ids
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Records for the ids the catalog knows, in the order of `app_ids`.
    /// Unknown ids are skipped.
    async fn game_info(&self, app_ids: &[u64]) -> Result<Vec<GameCandidate>>;

    /// Get provider name
    fn name(&self) -> &str;
}

/// Source of a user's friend list
#[async_trait]
pub trait FriendsProvider: Send + Sync {
    /// Profiles of everyone on `steam_id`'s friend list, unfiltered.
    ///
    /// Fails with `EngineError::PrivateFriendsList` when the list is not visible.
    async fn friends(&self, steam_id: u64) -> Result<Vec<SteamUser>>;

    /// Get provider name
    fn name(&self) -> &str;
}
