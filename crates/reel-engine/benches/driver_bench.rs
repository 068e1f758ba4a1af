//! Reel Motion Benchmarks
//!
//! Per-frame cost of the animation driver and the slot layout.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use reel_core::{ManualClock, Millis};
use reel_engine::{
    AnimationDriver, MachineConfig, MotionConfig, Reel, SlotMachine, SymbolStrip, TimingConfig,
};
use reel_state::MemoryBalanceStore;

const COLUMN_COUNTS: &[usize] = &[3, 5, 6, 64];
const FRAME: Millis = Millis(1000.0 / 60.0);

fn strip() -> SymbolStrip {
    SymbolStrip::from_config(&MachineConfig::default().strip).unwrap()
}

/// Benchmark one driver step over spinning reels
fn bench_driver_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("driver_step");
    let strip = strip();
    let driver = AnimationDriver::for_strip(&MotionConfig::default(), &strip);

    for &columns in COLUMN_COUNTS {
        let mut reels = vec![Reel::new(); columns];
        reels.iter_mut().for_each(Reel::start);

        group.bench_with_input(BenchmarkId::new("tick", columns), &columns, |b, _| {
            b.iter(|| {
                driver.tick(&mut reels, black_box(FRAME));
                black_box(&reels)
            })
        });

        group.bench_with_input(BenchmarkId::new("advance", columns), &columns, |b, _| {
            b.iter(|| black_box(driver.advance(&reels, black_box(FRAME))))
        });
    }

    group.finish();
}

/// Benchmark the per-reel slot layout
fn bench_layout(c: &mut Criterion) {
    let strip = strip();

    c.bench_function("layout_5_rows", |b| {
        b.iter(|| black_box(strip.layout(black_box(437.5), 5)))
    });

    c.bench_function("visible_symbols_5_rows", |b| {
        b.iter(|| black_box(strip.visible_symbols(black_box(437.5), 5)))
    });
}

/// Benchmark a full machine frame mid-spin
fn bench_machine_frame(c: &mut Criterion) {
    // Stops never come due inside the measurement window
    let config = MachineConfig::default().with_timing(TimingConfig::normal().scaled(1.0e9));
    let mut machine = SlotMachine::new(
        &config,
        MemoryBalanceStore::with_balance(u64::MAX),
        ManualClock::new(),
    )
    .unwrap();
    machine.spin().unwrap();

    c.bench_function("machine_frame", |b| {
        b.iter(|| {
            machine.clock_mut().advance(FRAME);
            black_box(machine.frame())
        })
    });
}

criterion_group!(benches, bench_driver_step, bench_layout, bench_machine_frame);
criterion_main!(benches);
