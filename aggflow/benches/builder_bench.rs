//! Benchmarks for building and rendering pipelines.

use aggflow::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn populated_builder() -> AggregationBuilder {
    let mut builder = AggregationBuilder::default();
    for i in 0..50 {
        builder.equality_match(format!("field{i}"), i, Target::Main);
    }
    builder
        .match_greater_than("age", 18, "cond")
        .equality_match("city", "New York", "then")
        .equality_match("city", "Boston", "else");
    builder
        .conditional_match("cond", "then", "else", Target::Main)
        .expect("all branches present");
    builder
        .switch_match("tier", [(json!({"$gte": ["$score", 90]}), json!("gold"))], Target::Main)
        .sort(SortSpec::new().desc("score"), Target::Main)
        .limit(10, Target::Main);
    builder
}

fn builder_benchmark(c: &mut Criterion) {
    c.bench_function("assemble", |b| b.iter(|| black_box(populated_builder().len())));

    let builder = populated_builder();
    c.bench_function("build_documents", |b| {
        b.iter(|| black_box(builder.build_documents().expect("renders")))
    });
}

criterion_group!(benches, builder_benchmark);
criterion_main!(benches);
