use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexmatch::core::{find_matches, try_find_swap, BoardSnapshot, Engine, EngineConfig};
use hexmatch::term::{BoardView, FrameBuffer, ViewMarks, Viewport};

fn started(seed: u32) -> Engine {
    let mut engine = Engine::new(EngineConfig::default().with_seed(seed)).unwrap();
    engine.start();
    engine
}

fn bench_find_matches(c: &mut Criterion) {
    let engine = started(12345);

    c.bench_function("find_matches_settled", |b| {
        b.iter(|| find_matches(black_box(engine.board())))
    });
}

fn bench_find_swap(c: &mut Criterion) {
    let engine = started(12345);

    c.bench_function("try_find_swap", |b| {
        b.iter(|| try_find_swap(black_box(engine.board())))
    });
}

fn bench_start(c: &mut Criterion) {
    let mut engine = started(12345);

    c.bench_function("deal_board", |b| {
        b.iter(|| {
            engine.start();
        })
    });
}

fn bench_hinted_swap(c: &mut Criterion) {
    let base = started(12345);

    c.bench_function("hinted_swap_cascade", |b| {
        b.iter(|| {
            let mut engine = base.clone();
            if let Some((x, y)) = engine.find_hint() {
                let _ = black_box(engine.apply_swap(x, y));
            }
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let engine = started(12345);
    let view = BoardView::default();
    let mut snap = BoardSnapshot::default();
    let mut fb = FrameBuffer::new(80, 24);

    c.bench_function("render_board_80x24", |b| {
        b.iter(|| {
            engine.snapshot_into(&mut snap);
            view.render_into(&snap, &ViewMarks::default(), Viewport::new(80, 24), &mut fb);
        })
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_find_swap,
    bench_start,
    bench_hinted_swap,
    bench_render
);
criterion_main!(benches);
