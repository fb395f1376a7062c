use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keyer_core::test_utils::KeyerSimulator;
use keyer_core::{KeyerConfig, KeyerFSM, KeyerMode, PaddleSide, PaddleState};

/// Raw state evaluation cost; one of these runs every millisecond
fn bench_fsm_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("fsm_step");

    for mode in [KeyerMode::Straight, KeyerMode::IambicA, KeyerMode::IambicB] {
        group.bench_with_input(BenchmarkId::new("squeeze", format!("{:?}", mode)), &mode, |b, &mode| {
            let config = KeyerConfig {
                mode,
                ..KeyerConfig::default()
            };
            let mut fsm = KeyerFSM::new(config);
            let both = PaddleState::new(true, true);
            b.iter(|| {
                if fsm.is_idle() {
                    fsm.wake();
                }
                black_box(fsm.step(black_box(both)))
            });
        });
    }

    group.finish();
}

/// One second of keying through the full driver at several speeds
fn bench_simulated_second(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulated_second");

    for wpm in [5u32, 20, 60] {
        group.bench_with_input(BenchmarkId::from_parameter(wpm), &wpm, |b, &wpm| {
            b.iter(|| {
                let mut sim = KeyerSimulator::new(KeyerConfig {
                    speed_wpm: wpm,
                    ..KeyerConfig::default()
                });
                sim.press(PaddleSide::Dot);
                sim.press(PaddleSide::Dash);
                sim.run_for(1_000);
                black_box(sim.edges().len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fsm_step, bench_simulated_second);
criterion_main!(benches);
