use thiserror::Error;

/// Main error type for the coplay engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Number of distinct users outside the configured range
    #[error("Cannot intersect {size} users: need between {min} and {max}")]
    InvalidGroup { size: usize, min: usize, max: usize },

    /// The user's games list cannot be read (visibility not public, or rate limited)
    #[error("The user with Steam ID {0} has a games list that cannot be accessed")]
    PrivateLibrary(u64),

    /// The user owns nothing, so the intersection is empty by definition
    #[error("The user with Steam ID {0} has no games to intersect")]
    EmptyLibrary(u64),

    /// An awaited operation exceeded its deadline
    #[error("{operation} timed out after {millis}ms")]
    Timeout { operation: String, millis: u64 },

    /// The user's friend list is not visible
    #[error("The user with Steam ID {0} has a friend list that cannot be accessed")]
    PrivateFriendsList(u64),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for EngineError {
    fn from(s: String) -> Self {
        EngineError::Other(s)
    }
}

impl From<&str> for EngineError {
    fn from(s: &str) -> Self {
        EngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;
