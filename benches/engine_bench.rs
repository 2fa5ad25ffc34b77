use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use hexsum::accel::{accelerated_options, NativeSolver, GAVE_UP};
use hexsum::board::{presets, EndgamePosition, HexState, Position};
use hexsum::eval::{EvalConfig, Evaluator};
use hexsum::search::{ExactSolver, SamplingSolver, TimeLimit};

/// THE Line after two central moves.
fn line_midgame() -> Position {
    Position::new(&presets()[3])
        .play(4, 0)
        .and_then(|p| p.play(3, 0))
        .unwrap()
}

fn bench_play(c: &mut Criterion) {
    let pos = Position::new(&presets()[2]);
    c.bench_function("play_hexagon_center", |b| {
        b.iter(|| black_box(&pos).play(black_box(2), black_box(2)))
    });
}

fn bench_play_endgame(c: &mut Criterion) {
    let pos = EndgamePosition::try_from(&Position::new(&presets()[2])).unwrap();
    c.bench_function("play_hexagon_center_endgame", |b| {
        b.iter(|| black_box(&pos).play(black_box(2), black_box(2)))
    });
}

fn bench_convert(c: &mut Criterion) {
    let pos = Position::new(&presets()[5]);
    c.bench_function("convert_triangle21", |b| {
        b.iter(|| EndgamePosition::try_from(black_box(&pos)))
    });
}

fn bench_exact_small_hexagon(c: &mut Criterion) {
    let pos = Position::new(&presets()[1]);
    c.bench_function("exact_small_hexagon", |b| {
        b.iter(|| ExactSolver::new(black_box(&pos), TimeLimit::Unlimited).solve())
    });
}

fn bench_exact_line(c: &mut Criterion) {
    let pos = line_midgame();
    let end = EndgamePosition::try_from(&pos).unwrap();
    let mut group = c.benchmark_group("exact_line");
    group.bench_function("general", |b| {
        b.iter(|| ExactSolver::new(black_box(&pos), TimeLimit::Unlimited).solve())
    });
    group.bench_function("endgame", |b| {
        b.iter(|| ExactSolver::new(black_box(&end), TimeLimit::Unlimited).solve())
    });
    group.finish();
}

fn bench_native_line(c: &mut Criterion) {
    let pos = line_midgame();
    c.bench_function("native_line", |b| {
        let mut solver = NativeSolver::new();
        b.iter(|| accelerated_options(&mut solver, black_box(&pos), Duration::from_secs(10), GAVE_UP))
    });
}

fn bench_sampling_triangle21_50ms(c: &mut Criterion) {
    let pos = EndgamePosition::try_from(&Position::new(&presets()[5])).unwrap();
    let mut group = c.benchmark_group("sampling");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));
    group.bench_function("triangle21_50ms", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| {
            SamplingSolver::new(black_box(&pos), 6, Duration::from_millis(50))
                .and_then(|s| s.run(&mut rng))
        })
    });
    group.finish();
}

fn bench_evaluate_hexagon_200ms(c: &mut Criterion) {
    let pos = Position::new(&presets()[2]);
    let mut group = c.benchmark_group("evaluate");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("hexagon_200ms", |b| {
        let config = EvalConfig {
            budget: Duration::from_millis(200),
            ..EvalConfig::default()
        };
        let mut evaluator = Evaluator::new(config).with_seed(3);
        b.iter(|| evaluator.evaluate(black_box(&pos)))
    });
    group.finish();
}

fn bench_position_clone(c: &mut Criterion) {
    let pos = Position::new(&presets()[5]);
    c.bench_function("position_clone", |b| b.iter(|| black_box(&pos).clone()));
}

criterion_group!(
    benches,
    bench_play,
    bench_play_endgame,
    bench_convert,
    bench_exact_small_hexagon,
    bench_exact_line,
    bench_native_line,
    bench_sampling_triangle21_50ms,
    bench_evaluate_hexagon_200ms,
    bench_position_clone,
);
criterion_main!(benches);
