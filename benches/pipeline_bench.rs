//! Benchmarks for scanning and the full pipeline.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use limpiar::{Column, DataType, Dataset, QualityPipeline, Scanner, Value};

/// Builds a dataset with a sprinkling of every defect class.
fn create_dataset(rows: usize) -> Dataset {
    let ids: Vec<Value> = (0..rows).map(|i| Value::Number(i as f64)).collect();
    let amounts: Vec<Value> = (0..rows)
        .map(|i| match i % 50 {
            0 => Value::Null,
            1 => Value::Text("n/a".to_string()),
            2 => Value::Number(1.0e6),
            _ => Value::Number(100.0 + (i % 17) as f64),
        })
        .collect();
    let regions: Vec<Value> = (0..rows)
        .map(|i| Value::Text(format!("region_{}", i % 5)))
        .collect();

    Dataset::new(
        "bench",
        vec![
            Column::new("id", DataType::Numeric, ids),
            Column::new("amount", DataType::Numeric, amounts),
            Column::new("region", DataType::Text, regions),
        ],
    )
    .expect("Failed to create dataset")
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for rows in [1_000, 10_000] {
        let dataset = create_dataset(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("sequential", rows), &dataset, |b, ds| {
            let scanner = Scanner::new();
            b.iter(|| scanner.scan(black_box(ds)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("parallel", rows), &dataset, |b, ds| {
            let scanner = Scanner::new().with_parallel(true);
            b.iter(|| scanner.scan(black_box(ds)).unwrap());
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for rows in [1_000, 10_000] {
        let dataset = create_dataset(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &dataset, |b, ds| {
            let pipeline = QualityPipeline::new();
            b.iter(|| pipeline.run(black_box(ds)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan, bench_pipeline);
criterion_main!(benches);
