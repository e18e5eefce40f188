//! Benchmarks for report extraction
//!
//! Measures `extract` on model output of increasing size, with the JSON
//! payload wrapped in prose and code fences the way models tend to answer.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use founderslens::analysis::{assemble, extract};
use std::hint::black_box;

fn model_output(competitors: usize) -> String {
    let competitors: Vec<String> = (0..competitors)
        .map(|i| {
            format!(
                r#"{{"name": "Competitor {i}", "market_share": {share}, "target_audience": "SMBs", "marketing_strategy": "Content marketing"}}"#,
                share = i % 100
            )
        })
        .collect();

    format!(
        "Sure! Here is the analysis you asked for.\n```json\n{{\"research\": {{\"competitors\": [{}], \"opportunity\": \"Large\", \"market_trends\": [\"a\", \"b\", \"c\", \"d\"]}}, \"strategy\": {{\"viability_score\": 74, \"summary\": \"Go\"}}}}\n```\nGood luck with the venture.",
        competitors.join(", ")
    )
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for size in [1, 10, 100] {
        let raw = model_output(size);
        group.bench_with_input(BenchmarkId::new("competitors", size), &raw, |b, raw| {
            b.iter(|| extract(black_box(raw)))
        });
    }

    let prose = "The model refused to answer in JSON. ".repeat(50);
    group.bench_function("no_json_span", |b| b.iter(|| extract(black_box(&prose))));

    group.finish();
}

fn bench_assemble_degraded(c: &mut Criterion) {
    c.bench_function("assemble_degraded", |b| {
        b.iter(|| assemble(black_box("AI tutor"), black_box("EdTech"), extract("no json")))
    });
}

criterion_group!(benches, bench_extract, bench_assemble_degraded);
criterion_main!(benches);
