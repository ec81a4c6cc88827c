use serde::{Deserialize, Serialize};

use crate::core::game_candidate::{deserialize_id, deserialize_text};

/// Steam community profile visibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Visibility(pub u8);

impl Visibility {
    pub const PRIVATE: Visibility = Visibility(1);
    pub const FRIENDS_ONLY: Visibility = Visibility(2);
    pub const PUBLIC: Visibility = Visibility(3);

    /// Only public profiles expose their games list
    pub fn is_public(&self) -> bool {
        *self == Self::PUBLIC
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Self::PUBLIC => "Public",
            Self::PRIVATE => "Private",
            _ => "Friends Only",
        }
    }

    /// Explanation shown for users that cannot be selected
    pub fn unavailable_reason(&self) -> Option<String> {
        if self.is_public() {
            None
        } else {
            Some(format!(
                "This user's Steam profile visibility is set to {}, and cannot be retrieved by this app.",
                self.label()
            ))
        }
    }
}

/// Accept `true`/`false` or a Steam persona state integer (0 = offline)
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlagValue {
        Bool(bool),
        Int(i64),
        Null,
    }

    Ok(match FlagValue::deserialize(deserializer)? {
        FlagValue::Bool(b) => b,
        FlagValue::Int(i) => i != 0,
        FlagValue::Null => false,
    })
}

/// A Steam user as shown in the friend picker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SteamUser {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub steam_id: u64,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub screen_name: String,

    /// Avatar image URL
    #[serde(default, deserialize_with = "deserialize_text")]
    pub avatar: String,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub online: bool,

    /// False when Steam returned no profile for the id
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub exists: bool,
}

impl SteamUser {
    pub fn new(steam_id: u64, screen_name: impl Into<String>) -> Self {
        Self {
            steam_id,
            screen_name: screen_name.into(),
            avatar: String::new(),
            visibility: Visibility::PUBLIC,
            online: false,
            exists: true,
        }
    }

    /// Whether the picker can show this user at all
    pub fn is_displayable(&self) -> bool {
        self.exists && !self.screen_name.is_empty() && !self.avatar.is_empty()
    }

    /// Whether the user can be added to a comparison
    pub fn is_selectable(&self) -> bool {
        self.visibility.is_public()
    }
}
