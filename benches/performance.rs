// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for moodseq
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Transition sampling
//! - Melody generation per mood
//! - Rendering and SMF encoding throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use moodseq::recording::MidiExporter;
use moodseq::{EventRenderer, MelodyGenerator, MoodRegistry};

fn bench_transition_sampling(c: &mut Criterion) {
    let registry = MoodRegistry::builtin();
    let happy = registry.lookup("happy").unwrap();
    let candidates = happy.transitions().next_candidates(60, happy.scale());
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("sample_weighted", |b| {
        b.iter(|| black_box(candidates.sample(&mut rng)))
    });
}

fn bench_generation(c: &mut Criterion) {
    let registry = MoodRegistry::builtin();
    let generator = MelodyGenerator::new(&registry);
    let mut group = c.benchmark_group("generate");

    for mood in ["happy", "sad", "energetic", "calm"] {
        group.bench_with_input(BenchmarkId::new(mood, 256), &mood, |b, &mood| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(generator.generate(mood, 256, &mut rng).unwrap()))
        });
    }

    group.finish();
}

fn bench_render_and_export(c: &mut Criterion) {
    let registry = MoodRegistry::builtin();
    let profile = registry.lookup("happy").unwrap();
    let renderer = EventRenderer::default();
    let mut group = c.benchmark_group("render");

    for size in [16, 256, 4096] {
        let mut rng = StdRng::seed_from_u64(11);
        let notes = MelodyGenerator::new(&registry)
            .generate("happy", size, &mut rng)
            .unwrap();
        let events = renderer.render(&notes, profile, &mut rng);
        let exporter = MidiExporter::for_profile(profile, 480);

        group.bench_with_input(BenchmarkId::new("events", size), &notes, |b, notes| {
            b.iter(|| black_box(renderer.render(notes, profile, &mut rng)))
        });

        group.bench_with_input(BenchmarkId::new("smf", size), &events, |b, events| {
            b.iter(|| black_box(exporter.export_to_bytes(events)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_transition_sampling,
    bench_generation,
    bench_render_and_export
);
criterion_main!(benches);
