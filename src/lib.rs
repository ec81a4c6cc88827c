//! # Coplay Engine
//!
//! Find the games a group of Steam friends can play together:
//! - Library intersection across 2-10 users
//! - Group-size aware ranking (games that seat everyone first)
//! - Friend picker ordering and search
//! - Explicit UI state machine
//! - Multiple interfaces: Rust library, Python bindings, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust
//! use coplay_engine::{GameCandidate, PlayerCount, RankingContext, Ranker, TierRanker};
//!
//! let games = vec![
//!     GameCandidate::new(1, "Solitaire", PlayerCount::Known(1)),
//!     GameCandidate::new(2, "Mystery", PlayerCount::Unknown),
//!     GameCandidate::new(3, "Party", PlayerCount::Known(5)),
//! ];
//!
//! let ranked = TierRanker::new().rank(games, RankingContext::new(4));
//! assert_eq!(ranked.names(), vec!["Mystery", "Party", "Solitaire"]);
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod providers;
pub mod ranking;
pub mod timeout;

// Re-export primary types
pub use config::EngineConfig;
pub use crate::core::{
    CapacityHint, GameCandidate, IntersectRequest, IntersectResponse, PlayerCount, RankedGame, RankedList, SteamUser,
    Tier, ZeroEncoding,
};
pub use engine::CoplayEngine;
pub use error::{EngineError, Result};
pub use ranking::{Ranker, RankingContext, TierRanker};

// Python bindings
#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
pub use python::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
