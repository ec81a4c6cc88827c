use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::core::{GameCandidate, SteamUser, ZeroEncoding};
use crate::error::{EngineError, Result};
use crate::providers::{CatalogProvider, FriendsProvider, LibraryProvider};

/// Libraries, catalog records and friend lists loaded from one JSON document.
///
/// ```json
/// {
///   "libraries": { "76561197960287930": [730, 570], "76561197960287931": null },
///   "free_games": { "76561197960287930": [440] },
///   "games": [ { "steam_id": 730, "name": "Counter-Strike 2", "supported_players": "?" } ],
///   "friends": { "76561197960287930": [ { "steam_id": "76561197960287931", "screen_name": "pal" } ] }
/// }
/// ```
///
/// A `null` library or friend list is private. `free_games` lists the
/// played free games, which only count with `include_free_games`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub libraries: HashMap<u64, Option<Vec<u64>>>,
    #[serde(default)]
    pub free_games: HashMap<u64, Vec<u64>>,
    #[serde(default)]
    pub games: Vec<GameCandidate>,
    #[serde(default)]
    pub friends: HashMap<u64, Option<Vec<SteamUser>>>,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Other(format!("Failed to read fixture {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Split into providers, applying the `0` player count rule to the catalog
    pub fn into_providers(self, encoding: ZeroEncoding) -> (MemoryLibrary, MemoryCatalog, MemoryFriends) {
        let mut library = MemoryLibrary::new();
        for (steam_id, games) in self.libraries {
            match games {
                Some(games) => library.insert(steam_id, games),
                None => library.insert_private(steam_id),
            }
        }
        for (steam_id, games) in self.free_games {
            library.insert_free(steam_id, games);
        }

        let mut friends = MemoryFriends::new();
        for (steam_id, list) in self.friends {
            match list {
                Some(list) => friends.insert(steam_id, list),
                None => friends.insert_private(steam_id),
            }
        }

        let catalog = MemoryCatalog::new(self.games.into_iter().map(|g| g.normalized(encoding)));
        (library, catalog, friends)
    }
}

/// In-memory owned-games lists
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    libraries: HashMap<u64, Option<HashSet<u64>>>,
    free_games: HashMap<u64, HashSet<u64>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, steam_id: u64, games: impl IntoIterator<Item = u64>) {
        self.libraries.insert(steam_id, Some(games.into_iter().collect()));
    }

    pub fn insert_private(&mut self, steam_id: u64) {
        self.libraries.insert(steam_id, None);
    }

    /// Record played free games for `steam_id`
    pub fn insert_free(&mut self, steam_id: u64, games: impl IntoIterator<Item = u64>) {
        self.free_games.entry(steam_id).or_default().extend(games);
    }

    pub fn with_library(mut self, steam_id: u64, games: impl IntoIterator<Item = u64>) -> Self {
        self.insert(steam_id, games);
        self
    }

    pub fn with_private(mut self, steam_id: u64) -> Self {
        self.insert_private(steam_id);
        self
    }

    pub fn with_free_games(mut self, steam_id: u64, games: impl IntoIterator<Item = u64>) -> Self {
        self.insert_free(steam_id, games);
        self
    }
}

#[async_trait]
impl LibraryProvider for MemoryLibrary {
    async fn owned_games(&self, steam_id: u64, include_free_games: bool) -> Result<HashSet<u64>> {
        // Unknown ids are indistinguishable from hidden ones upstream
        let mut owned = match self.libraries.get(&steam_id) {
            Some(Some(games)) => games.clone(),
            Some(None) | None => return Err(EngineError::PrivateLibrary(steam_id)),
        };

        if include_free_games {
            if let Some(free) = self.free_games.get(&steam_id) {
                owned.extend(free.iter().copied());
            }
        }

        Ok(owned)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// In-memory game metadata keyed by app id
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    games: HashMap<u64, GameCandidate>,
}

impl MemoryCatalog {
    pub fn new(games: impl IntoIterator<Item = GameCandidate>) -> Self {
        Self {
            games: games.into_iter().map(|g| (g.steam_id, g)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[async_trait]
impl CatalogProvider for MemoryCatalog {
    async fn game_info(&self, app_ids: &[u64]) -> Result<Vec<GameCandidate>> {
        let found: Vec<GameCandidate> = app_ids
            .iter()
            .filter_map(|id| self.games.get(id).cloned())
            .collect();

        if found.len() < app_ids.len() {
            tracing::debug!("Catalog has no record for {} of {} games", app_ids.len() - found.len(), app_ids.len());
        }

        Ok(found)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// In-memory friend lists
#[derive(Debug, Clone, Default)]
pub struct MemoryFriends {
    lists: HashMap<u64, Option<Vec<SteamUser>>>,
}

impl MemoryFriends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, steam_id: u64, friends: impl IntoIterator<Item = SteamUser>) {
        self.lists.insert(steam_id, Some(friends.into_iter().collect()));
    }

    pub fn insert_private(&mut self, steam_id: u64) {
        self.lists.insert(steam_id, None);
    }

    pub fn with_friends(mut self, steam_id: u64, friends: impl IntoIterator<Item = SteamUser>) -> Self {
        self.insert(steam_id, friends);
        self
    }

    pub fn with_private(mut self, steam_id: u64) -> Self {
        self.insert_private(steam_id);
        self
    }
}

#[async_trait]
impl FriendsProvider for MemoryFriends {
    async fn friends(&self, steam_id: u64) -> Result<Vec<SteamUser>> {
        match self.lists.get(&steam_id) {
            Some(Some(friends)) => Ok(friends.clone()),
            Some(None) | None => Err(EngineError::PrivateFriendsList(steam_id)),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerCount;

    const FIXTURE: &str = r#"{
        "libraries": { "1": [10, 20], "2": null },
        "free_games": { "1": [30] },
        "games": [
            { "steam_id": 10, "name": "Ten", "supported_players": "0" },
            { "steam_id": 20, "name": "Twenty", "supported_players": 4 }
        ],
        "friends": {
            "1": [ { "steam_id": "2", "screen_name": "pal", "avatar": "p.png", "exists": true } ],
            "2": null
        }
    }"#;

    #[test]
    fn test_fixture_providers() {
        let (library, catalog, friends) =
            Fixture::from_json(FIXTURE).unwrap().into_providers(ZeroEncoding::Unknown);

        let owned = tokio_test::block_on(library.owned_games(1, false)).unwrap();
        assert_eq!(owned, HashSet::from([10, 20]));

        let with_free = tokio_test::block_on(library.owned_games(1, true)).unwrap();
        assert_eq!(with_free, HashSet::from([10, 20, 30]));

        let private = tokio_test::block_on(library.owned_games(2, false));
        assert!(matches!(private, Err(EngineError::PrivateLibrary(2))));

        let missing = tokio_test::block_on(library.owned_games(3, true));
        assert!(matches!(missing, Err(EngineError::PrivateLibrary(3))));

        let pals = tokio_test::block_on(friends.friends(1)).unwrap();
        assert_eq!(pals.len(), 1);
        assert_eq!(pals[0].steam_id, 2);
        assert!(matches!(
            tokio_test::block_on(friends.friends(2)),
            Err(EngineError::PrivateFriendsList(2))
        ));

        let games = tokio_test::block_on(catalog.game_info(&[20, 99, 10])).unwrap();
        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Twenty", "Ten"]);
        assert_eq!(games[1].supported_players, PlayerCount::Unknown);
    }

    #[test]
    fn test_builder() {
        let library = MemoryLibrary::new()
            .with_library(5, [1, 2, 3])
            .with_free_games(5, [3, 4])
            .with_private(6)
            .with_free_games(6, [4]);
        assert_eq!(tokio_test::block_on(library.owned_games(5, false)).unwrap().len(), 3);
        assert_eq!(tokio_test::block_on(library.owned_games(5, true)).unwrap().len(), 4);
        assert!(tokio_test::block_on(library.owned_games(6, true)).is_err());

        let friends = MemoryFriends::new().with_friends(5, [SteamUser::new(6, "six")]).with_private(6);
        assert_eq!(tokio_test::block_on(friends.friends(5)).unwrap().len(), 1);
        assert!(tokio_test::block_on(friends.friends(7)).is_err());
    }
}
