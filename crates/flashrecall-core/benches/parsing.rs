use criterion::{black_box, criterion_group, criterion_main, Criterion};

use flashrecall_core::catalog::StoryCatalog;
use flashrecall_core::text::tokenize;

fn catalog_json(stories: usize) -> String {
    let entries: Vec<String> = (0..stories)
        .map(|i| {
            format!(
                r#"{{"title": "Story {i}", "sentences": ["Sentence one of story {i}.", "Another line, with punctuation!", "The end."]}}"#
            )
        })
        .collect();
    format!(
        r#"{{"simple": [{}], "medium": [], "hard": []}}"#,
        entries.join(",")
    )
}

fn bench_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");

    let small = catalog_json(10);
    let large = catalog_json(1_000);

    group.bench_function("10_stories", |b| {
        b.iter(|| StoryCatalog::from_json(black_box(&small)))
    });

    group.bench_function("1000_stories", |b| {
        b.iter(|| StoryCatalog::from_json(black_box(&large)))
    });

    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let text = "It was the best of times, it was the worst of times -- it was the age of wisdom!".repeat(20);

    c.bench_function("tokenize", |b| {
        b.iter(|| tokenize(black_box(&text)).count())
    });
}

criterion_group!(benches, bench_catalog, bench_tokenize);
criterion_main!(benches);
