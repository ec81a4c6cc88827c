use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire marker for a player count the catalog could not determine
pub const UNKNOWN_MARKER: &str = "?";

/// Maximum number of simultaneous players a game supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerCount {
    Known(u32),
    #[default]
    Unknown,
}

/// How a decoded `0` should be read.
///
/// Older payloads used `"0"` where newer ones send `"?"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroEncoding {
    /// `0` means the count is unknown (legacy payloads)
    Unknown,
    /// `0` is a real count
    Known,
}

impl PlayerCount {
    /// Apply the legacy `0` rule.
    pub fn normalize(self, encoding: ZeroEncoding) -> Self {
        match (self, encoding) {
            (PlayerCount::Known(0), ZeroEncoding::Unknown) => PlayerCount::Unknown,
            (count, _) => count,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PlayerCount::Unknown)
    }

    pub fn known(&self) -> Option<u32> {
        match self {
            PlayerCount::Known(n) => Some(*n),
            PlayerCount::Unknown => None,
        }
    }

    /// Display text: the number, or `?`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerCount::Known(n) => write!(f, "{}", n),
            PlayerCount::Unknown => f.write_str(UNKNOWN_MARKER),
        }
    }
}

impl From<u32> for PlayerCount {
    fn from(n: u32) -> Self {
        PlayerCount::Known(n)
    }
}

impl Serialize for PlayerCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PlayerCount::Known(n) => serializer.serialize_u32(*n),
            PlayerCount::Unknown => serializer.serialize_str(UNKNOWN_MARKER),
        }
    }
}

/// Accepts numbers, numeric strings and `"?"`.
///
/// Never fails: anything else is logged and read as unknown.
impl<'de> Deserialize<'de> for PlayerCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCount {
            Int(u64),
            Text(String),
            Other(serde_json::Value),
        }

        let count = match RawCount::deserialize(deserializer)? {
            RawCount::Int(n) => PlayerCount::Known(saturate(n)),
            RawCount::Text(s) => parse_text(&s),
            RawCount::Other(serde_json::Value::Null) => PlayerCount::Unknown,
            RawCount::Other(value) => {
                tracing::warn!("Malformed supported_players {}, treating as unknown", value);
                PlayerCount::Unknown
            }
        };

        Ok(count)
    }
}

fn parse_text(s: &str) -> PlayerCount {
    let trimmed = s.trim();
    if trimmed == UNKNOWN_MARKER {
        return PlayerCount::Unknown;
    }
    match trimmed.parse::<u64>() {
        Ok(n) => PlayerCount::Known(saturate(n)),
        Err(_) => {
            tracing::warn!("Malformed supported_players {:?}, treating as unknown", s);
            PlayerCount::Unknown
        }
    }
}

fn saturate(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
