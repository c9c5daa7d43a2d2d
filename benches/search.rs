use ai_2048_minimax::engine::{self as GameEngine, Board, Move};
use ai_2048_minimax::minimax::{self, Minimax, MinimaxParallel, SearchConfig};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use rayon::ThreadPoolBuilder;
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    GameEngine::new();
    let mut rng = StdRng::seed_from_u64(4242);
    let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    let mut boards = vec![b];
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..32 {
        let nb = b.shift(seq[i % seq.len()]);
        if nb != b { b = nb.with_random_tile(&mut rng); }
        boards.push(b);
    }
    boards
}

fn bench_heuristic(c: &mut Criterion) {
    let boards = corpus();
    c.bench_function("heuristic/evaluate", |bch| {
        bch.iter(|| boards.iter().fold(0u64, |acc, bd| acc.wrapping_add(minimax::evaluate(bd))))
    });
}

fn bench_seq(c: &mut Criterion) {
    let boards = corpus();
    let mut search = Minimax::new();
    c.bench_function("minimax_seq/recommend_move", |bch| {
        bch.iter(|| {
            let mut acc = 0u64;
            for bd in &boards {
                acc ^= search.recommend_move(bd).map(|m| m as u64).unwrap_or(0);
            }
            black_box(acc)
        })
    });

    for (name, pruning) in [("minimax_seq/depth3_pruned", true), ("minimax_seq/depth3_exhaustive", false)] {
        let cfg = SearchConfig { fixed_depth: Some(3), pruning, ..Default::default() };
        let mut search = Minimax::with_config(cfg);
        c.bench_function(name, |bch| {
            bch.iter(|| {
                let mut acc = 0.0;
                for bd in &boards {
                    for be in search.branch_evals(bd) { if be.legal { acc += be.score; } }
                }
                black_box(acc)
            })
        });
    }
}

fn bench_par(c: &mut Criterion) {
    // Pin a small pool for stability
    let pool = ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let boards = corpus();
    let mut search = MinimaxParallel::new();
    c.bench_function("minimax_par/recommend_move", |bch| {
        bch.iter(|| pool.install(|| {
            let mut acc = 0u64;
            for bd in &boards {
                acc ^= search.recommend_move(bd).map(|m| m as u64).unwrap_or(0);
            }
            black_box(acc)
        }))
    });
}

criterion_group!(search, bench_heuristic, bench_seq, bench_par);
criterion_main!(search);
