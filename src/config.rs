//! Engine configuration.
//!
//! Values come from defaults, a key/value map, or `COPLAY_*` environment
//! variables. Missing keys always fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::core::ZeroEncoding;
use crate::error::{EngineError, Result};

const ENV_PREFIX: &str = "COPLAY_";

/// Runtime configuration for [`crate::CoplayEngine`] and [`crate::app`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use coplay_engine::EngineConfig;
///
/// let mut map = HashMap::new();
/// map.insert("max_group_size".to_string(), "4".to_string());
///
/// let config = EngineConfig::from_map(&map).unwrap();
/// assert_eq!(config.max_group_size, 4);
/// assert_eq!(config.min_group_size, 2); // default
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fewest distinct users an intersection accepts
    pub min_group_size: usize,

    /// Most distinct users an intersection accepts (also the selection cap)
    pub max_group_size: usize,

    /// Deadline for fetching one user's library and the catalog lookup
    pub library_timeout_ms: u64,

    /// Deadline for fetching the friend list
    pub friends_timeout_ms: u64,

    /// Treat a supported player count of `0` as unknown (legacy payloads)
    pub legacy_zero_unknown: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_group_size: 2,
            max_group_size: 10,
            library_timeout_ms: 30_000,
            friends_timeout_ms: 10_000,
            legacy_zero_unknown: true,
        }
    }
}

impl EngineConfig {
    /// Build from a key/value map (keys are the field names).
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            min_group_size: parse_or(map, "min_group_size", defaults.min_group_size)?,
            max_group_size: parse_or(map, "max_group_size", defaults.max_group_size)?,
            library_timeout_ms: parse_or(map, "library_timeout_ms", defaults.library_timeout_ms)?,
            friends_timeout_ms: parse_or(map, "friends_timeout_ms", defaults.friends_timeout_ms)?,
            legacy_zero_unknown: parse_or(map, "legacy_zero_unknown", defaults.legacy_zero_unknown)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Build from `COPLAY_*` environment variables, e.g. `COPLAY_MAX_GROUP_SIZE`.
    pub fn from_env() -> Result<Self> {
        Self::from_map(&collect_prefixed(std::env::vars()))
    }

    /// Check the cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.min_group_size == 0 {
            return Err(EngineError::Config("min_group_size must be at least 1".to_string()));
        }
        if self.min_group_size > self.max_group_size {
            return Err(EngineError::Config(format!(
                "min_group_size ({}) exceeds max_group_size ({})",
                self.min_group_size, self.max_group_size
            )));
        }
        if self.library_timeout_ms == 0 || self.friends_timeout_ms == 0 {
            return Err(EngineError::Config("timeouts must be positive".to_string()));
        }
        Ok(())
    }

    pub fn library_timeout(&self) -> Duration {
        Duration::from_millis(self.library_timeout_ms)
    }

    pub fn friends_timeout(&self) -> Duration {
        Duration::from_millis(self.friends_timeout_ms)
    }

    /// How a decoded `0` player count should be interpreted.
    pub fn zero_encoding(&self) -> ZeroEncoding {
        if self.legacy_zero_unknown {
            ZeroEncoding::Unknown
        } else {
            ZeroEncoding::Known
        }
    }
}

fn parse_or<T>(map: &HashMap<String, String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match map.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| EngineError::Config(format!("{key}: invalid value '{raw}': {e}"))),
        None => Ok(default),
    }
}

/// `COPLAY_MAX_GROUP_SIZE=4` → `max_group_size = "4"`
fn collect_prefixed<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|field| (field.to_lowercase(), value))
        })
        .collect()
}
