use std::hint::black_box;

use blockbreaker_core::*;
use criterion::{Criterion, criterion_group, criterion_main};

fn snapshot(size: Coord2) -> MatchSnapshot {
    let cells = RandomBoardGenerator::new(42).generate(size, MAX_BLOCK_TYPES);
    let scores = PlayerScores::with_scores("player-one", 12_400, 9_800).unwrap();
    MatchSnapshot::new(cells, 11, scores).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let snapshot = snapshot((16, 16));

    c.bench_function("encode_16x16", |b| b.iter(|| encode(black_box(&snapshot))));
}

fn bench_decode(c: &mut Criterion) {
    let blob = encode(&snapshot((16, 16)));

    c.bench_function("decode_16x16", |b| b.iter(|| decode(black_box(&blob))));
}

fn bench_turn_cycle(c: &mut Criterion) {
    let config = MatchConfig::default();
    let board = GridBoard::from_cells(RandomBoardGenerator::new(7).generate((8, 8), 4));

    c.bench_function("clear_refill_handoff_8x8", |b| {
        b.iter(|| {
            let mut board = board.clone();
            let mut controller = TurnController::local(&config, 7);
            let batch = ClearBatch::new(vec![(0, 0), (1, 0), (2, 0)], ClearReason::Scripted);
            for &coords in &batch.cleared {
                board.destroy_block(coords);
            }
            board.collapse();
            controller.on_clear(&batch, 0).unwrap();
            black_box(controller.tick(10_000, &mut board))
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_turn_cycle);
criterion_main!(benches);
