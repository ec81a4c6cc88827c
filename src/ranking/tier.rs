//! Group-size tiering of intersection results.
//!
//! Games that seat the whole group (or whose capacity is unknown) come
//! first, everything else after. Inside a tier all games compare equal, so
//! the stable sort keeps the order the catalog returned them in. Ranking by
//! raw capacity is deliberately avoided: a two-player game is as good a pick
//! as an eight-player one for two people.

use std::cmp::Ordering;

use crate::core::{CapacityHint, GameCandidate, PlayerCount, RankedGame, RankedList, Tier};
use crate::ranking::{Ranker, RankingContext};

/// Whether a game can seat the whole group. Unknown counts get the benefit of the doubt.
pub fn accommodates(players: PlayerCount, ctx: RankingContext) -> bool {
    match players {
        PlayerCount::Unknown => true,
        PlayerCount::Known(n) => n as usize >= ctx.group_size,
    }
}

pub fn tier_of(game: &GameCandidate, ctx: RankingContext) -> Tier {
    if accommodates(game.supported_players, ctx) {
        Tier::Adequate
    } else {
        Tier::Inadequate
    }
}

/// Two-tier comparator: `Less` only when `a` is adequate and `b` is not.
pub fn compare_candidates(a: &GameCandidate, b: &GameCandidate, ctx: RankingContext) -> Ordering {
    tier_of(a, ctx).cmp(&tier_of(b, ctx))
}

/// Sort in place. `sort_by` is stable, which the tie rule relies on.
pub fn sort_candidates(candidates: &mut [GameCandidate], ctx: RankingContext) {
    candidates.sort_by(|a, b| compare_candidates(a, b, ctx));
}

/// Sorted copy of `candidates`
pub fn rank_candidates(candidates: &[GameCandidate], ctx: RankingContext) -> Vec<GameCandidate> {
    let mut ranked = candidates.to_vec();
    sort_candidates(&mut ranked, ctx);
    ranked
}

/// Default ranker: drops nameless records, then tiers by group size
pub struct TierRanker;

impl TierRanker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TierRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ranker for TierRanker {
    fn rank(&self, candidates: Vec<GameCandidate>, ctx: RankingContext) -> RankedList {
        let total = candidates.len();

        let mut displayable: Vec<GameCandidate> = candidates
            .into_iter()
            .filter(|game| {
                if !game.is_displayable() {
                    tracing::warn!("Game with Steam ID {} has no name, dropping from list", game.steam_id);
                }
                game.is_displayable()
            })
            .collect();
        let dropped = total - displayable.len();

        sort_candidates(&mut displayable, ctx);

        let games: Vec<RankedGame> = displayable
            .into_iter()
            .map(|game| RankedGame {
                tier: tier_of(&game, ctx),
                hint: CapacityHint::for_count(game.supported_players, ctx.group_size),
                game,
            })
            .collect();

        tracing::debug!("Ranked {} games for {} users ({} dropped)", games.len(), ctx.group_size, dropped);

        RankedList::new(ctx.group_size, games, dropped).with_ranking_method(self.name())
    }

    fn name(&self) -> &str {
        "tier"
    }
}
