pub mod friends;
pub mod tier;

use crate::core::{GameCandidate, RankedList};

pub use friends::{compare_friends, matches_search, retain_displayable, sort_friends};
pub use tier::{accommodates, compare_candidates, rank_candidates, sort_candidates, tier_of, TierRanker};

/// Number of users a list is being ranked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RankingContext {
    pub group_size: usize,
}

impl RankingContext {
    pub fn new(group_size: usize) -> Self {
        Self { group_size }
    }
}

/// Trait for ordering intersection results for display
pub trait Ranker: Send + Sync {
    /// Drop records that cannot be shown and order the rest
    fn rank(&self, candidates: Vec<GameCandidate>, ctx: RankingContext) -> RankedList;

    /// Get ranker name for logging
    fn name(&self) -> &str;
}
