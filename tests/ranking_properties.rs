//! Property tests for the group-size tiering.

use coplay_engine::ranking::{rank_candidates, tier_of, RankingContext};
use coplay_engine::{GameCandidate, PlayerCount, Tier};
use proptest::prelude::*;

fn player_count() -> impl Strategy<Value = PlayerCount> {
    prop_oneof![
        1 => Just(PlayerCount::Unknown),
        4 => (0u32..16).prop_map(PlayerCount::Known),
    ]
}

/// Candidates tagged with their input position in `steam_id`
fn candidates() -> impl Strategy<Value = Vec<GameCandidate>> {
    prop::collection::vec(player_count(), 0..40).prop_map(|counts| {
        counts
            .into_iter()
            .enumerate()
            .map(|(i, players)| GameCandidate::new(i as u64, format!("Game {}", i), players))
            .collect()
    })
}

proptest! {
    #[test]
    fn adequate_tier_comes_first(games in candidates(), group_size in 0usize..12) {
        let ctx = RankingContext::new(group_size);
        let ranked = rank_candidates(&games, ctx);

        let first_inadequate = ranked.iter().position(|g| tier_of(g, ctx) == Tier::Inadequate);
        if let Some(split) = first_inadequate {
            prop_assert!(ranked[split..].iter().all(|g| tier_of(g, ctx) == Tier::Inadequate));
        }
    }

    #[test]
    fn output_is_permutation(games in candidates(), group_size in 0usize..12) {
        let ranked = rank_candidates(&games, RankingContext::new(group_size));

        let mut input_ids: Vec<u64> = games.iter().map(|g| g.steam_id).collect();
        let mut output_ids: Vec<u64> = ranked.iter().map(|g| g.steam_id).collect();
        input_ids.sort_unstable();
        output_ids.sort_unstable();
        prop_assert_eq!(input_ids, output_ids);
    }

    #[test]
    fn ties_keep_input_order(games in candidates(), group_size in 0usize..12) {
        let ctx = RankingContext::new(group_size);
        let ranked = rank_candidates(&games, ctx);

        for tier in [Tier::Adequate, Tier::Inadequate] {
            let expected: Vec<u64> = games.iter().filter(|g| tier_of(g, ctx) == tier).map(|g| g.steam_id).collect();
            let actual: Vec<u64> = ranked.iter().filter(|g| tier_of(g, ctx) == tier).map(|g| g.steam_id).collect();
            prop_assert_eq!(expected, actual);
        }
    }

    #[test]
    fn ranking_is_idempotent(games in candidates(), group_size in 0usize..12) {
        let ctx = RankingContext::new(group_size);
        let once = rank_candidates(&games, ctx);
        let twice = rank_candidates(&once, ctx);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn zero_group_is_all_adequate(games in candidates()) {
        let ctx = RankingContext::new(0);
        prop_assert!(games.iter().all(|g| tier_of(g, ctx) == Tier::Adequate));
        prop_assert_eq!(rank_candidates(&games, ctx), games);
    }

    #[test]
    fn unknown_is_always_adequate(group_size in 0usize..1000) {
        let game = GameCandidate::new(1, "Mystery", PlayerCount::Unknown);
        prop_assert_eq!(tier_of(&game, RankingContext::new(group_size)), Tier::Adequate);
    }
}

#[test]
fn documented_examples() {
    let ctx = RankingContext::new(4);
    let games = vec![
        GameCandidate::new(1, "A", PlayerCount::Known(1)),
        GameCandidate::new(2, "B", PlayerCount::Unknown),
        GameCandidate::new(3, "C", PlayerCount::Known(5)),
    ];
    let names: Vec<String> = rank_candidates(&games, ctx).into_iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["B", "C", "A"]);

    let ctx = RankingContext::new(2);
    let games = vec![
        GameCandidate::new(1, "X", PlayerCount::Known(2)),
        GameCandidate::new(2, "Y", PlayerCount::Known(1)),
    ];
    let names: Vec<String> = rank_candidates(&games, ctx).into_iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["X", "Y"]);

    for group_size in [0, 2, 10] {
        assert!(rank_candidates(&[], RankingContext::new(group_size)).is_empty());
    }
}
