use std::hint::black_box;

use bigroad::{BigRoadLayout, LayoutConfig, Logger, NullSink, Outcome, ScreenPreset};
use criterion::{Criterion, criterion_group, criterion_main};

/// Deterministic streaky shoe: run lengths cycle 1..=7.
fn shoe(len: usize) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(len);
    let mut current = Outcome::Banker;
    let mut run = 1;
    while outcomes.len() < len {
        for _ in 0..run {
            outcomes.push(current);
        }
        current = current.opposite();
        run = run % 7 + 1;
    }
    outcomes.truncate(len);
    outcomes
}

fn layout_presets(c: &mut Criterion) {
    let outcomes = shoe(80);
    let preview = shoe(6);

    for (name, preset) in [
        ("layout_history_6x42", ScreenPreset::History),
        ("layout_compact_6x20", ScreenPreset::Compact),
        ("layout_editor_6x18", ScreenPreset::Editor),
    ] {
        let engine = BigRoadLayout::new(LayoutConfig::preset(preset)).expect("engine");
        c.bench_function(name, |b| {
            b.iter(|| engine.layout(black_box(&outcomes), black_box(&preview)));
        });
    }
}

fn layout_instrumented(c: &mut Criterion) {
    let outcomes = shoe(80);
    let mut engine = BigRoadLayout::new(LayoutConfig::default())
        .expect("engine")
        .with_logger(Logger::new(NullSink));
    engine.enable_metrics();

    c.bench_function("layout_history_logged", |b| {
        b.iter(|| engine.layout(black_box(&outcomes), &[]));
    });
}

criterion_group!(benches, layout_presets, layout_instrumented);
criterion_main!(benches);
