use serde::{Deserialize, Serialize};

use crate::core::{PlayerCount, ZeroEncoding};

/// Cover art base URL; append `<cover_id>.jpg`
pub const COVER_URL_BASE: &str = "https://images.igdb.com/igdb/image/upload/t_cover_small/";

/// Deserialize an id from a number or a stringified number
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdValue {
        Int(u64),
        String(String),
        Null,
    }

    match IdValue::deserialize(deserializer)? {
        IdValue::Int(i) => Ok(i),
        IdValue::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::custom(format!("Invalid id string: {}", s))),
        IdValue::Null => Ok(0),
    }
}

/// Deserialize a string field, reading `null` as empty
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A game owned by every user in the group, eligible for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameCandidate {
    /// Steam App ID
    #[serde(default, deserialize_with = "deserialize_id")]
    pub steam_id: u64,

    /// IGDB ID
    #[serde(default, deserialize_with = "deserialize_id")]
    pub igdb_id: u64,

    /// Game name; empty means the record cannot be displayed
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,

    /// Maximum simultaneous players
    #[serde(default)]
    pub supported_players: PlayerCount,

    /// Cover image id (see [`COVER_URL_BASE`])
    #[serde(default, deserialize_with = "deserialize_text")]
    pub cover_id: String,

    #[serde(default)]
    pub has_multiplayer: bool,
}

impl GameCandidate {
    pub fn new(steam_id: u64, name: impl Into<String>, supported_players: PlayerCount) -> Self {
        Self {
            steam_id,
            igdb_id: 0,
            name: name.into(),
            supported_players,
            cover_id: String::new(),
            has_multiplayer: matches!(supported_players, PlayerCount::Known(n) if n > 1),
        }
    }

    /// Set the cover image id
    pub fn with_cover(mut self, cover_id: impl Into<String>) -> Self {
        self.cover_id = cover_id.into();
        self
    }

    /// Whether the renderer can show this record
    pub fn is_displayable(&self) -> bool {
        !self.name.is_empty()
    }

    /// Cover image URL, if the catalog knows one
    pub fn cover_url(&self) -> Option<String> {
        if self.cover_id.is_empty() {
            None
        } else {
            Some(format!("{}{}.jpg", COVER_URL_BASE, self.cover_id))
        }
    }

    /// Apply the legacy `0` rule to the player count
    pub fn normalized(mut self, encoding: ZeroEncoding) -> Self {
        self.supported_players = self.supported_players.normalize(encoding);
        self
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        format!("{} [{} players]", self.name, self.supported_players)
    }
}
