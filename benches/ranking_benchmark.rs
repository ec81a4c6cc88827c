use criterion::{black_box, criterion_group, criterion_main, Criterion};
use coplay_engine::{
    ranking::{rank_candidates, Ranker, RankingContext, TierRanker},
    GameCandidate, PlayerCount,
};

fn create_test_candidates(count: usize) -> Vec<GameCandidate> {
    (0..count)
        .map(|i| {
            let players = if i % 7 == 0 {
                PlayerCount::Unknown
            } else {
                PlayerCount::Known((i % 9) as u32)
            };
            GameCandidate::new(i as u64, format!("Test Game {}", i), players)
        })
        .collect()
}

fn bench_tier_ranking(c: &mut Criterion) {
    let ctx = RankingContext::new(4);

    let candidates_100 = create_test_candidates(100);
    let candidates_1000 = create_test_candidates(1000);
    let candidates_10000 = create_test_candidates(10000);

    c.bench_function("tier_sort_100", |b| {
        b.iter(|| black_box(rank_candidates(&candidates_100, ctx)));
    });

    c.bench_function("tier_sort_1000", |b| {
        b.iter(|| black_box(rank_candidates(&candidates_1000, ctx)));
    });

    c.bench_function("tier_sort_10000", |b| {
        b.iter(|| black_box(rank_candidates(&candidates_10000, ctx)));
    });

    let ranker = TierRanker::new();
    c.bench_function("tier_ranker_1000", |b| {
        b.iter(|| black_box(ranker.rank(candidates_1000.clone(), ctx)));
    });
}

criterion_group!(benches, bench_tier_ranking);
criterion_main!(benches);
