//! Criterion micro-benchmark of the result normalizer: zipping column
//! descriptors onto positional row tuples at several result-set sizes.
//! Row data is seeded so every run normalizes identical values.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pg_session::{ColumnInfo, SqlValue, normalize};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const WIDTH: usize = 8;

fn column_set() -> Vec<ColumnInfo> {
    (0..WIDTH)
        .map(|i| ColumnInfo::new(format!("col_{i}"), "int8"))
        .collect()
}

fn row_data(rows: usize) -> Vec<Vec<SqlValue>> {
    let mut rng = StdRng::seed_from_u64(1_234_567_890);
    (0..rows)
        .map(|_| {
            (0..WIDTH)
                .map(|_| match rng.random_range(0..4) {
                    0 => SqlValue::Int(rng.random()),
                    1 => SqlValue::Float(rng.random()),
                    2 => SqlValue::Text("payload".to_string()),
                    _ => SqlValue::Null,
                })
                .collect()
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let columns = column_set();
    let mut group = c.benchmark_group("normalize_rows");
    for &rows in &[16_usize, 256, 4096] {
        let data = row_data(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| normalize(black_box(&columns), black_box(data.clone())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
