use criterion::{black_box, criterion_group, criterion_main, Criterion};

use csv_pivot::reshape::{melt_to_rows, pivot_to_columns};
use csv_pivot::types::{Schema, Table, Value};

fn row_table(entities: usize, categories: usize) -> Table {
    let mut rows = Vec::with_capacity(entities * categories);
    for e in 0..entities {
        for c in 0..categories {
            // Leave roughly a third of the pairs out so the pivot has zeros to fill.
            if (e + c) % 3 == 0 {
                continue;
            }
            rows.push(vec![
                Value::text(format!("P{c}")),
                Value::text(format!("D{e:05}")),
                Value::text(((e * 7 + c) % 500).to_string()),
            ]);
        }
    }
    Table::new(Schema::utf8(["project", "designator", "volume"]), rows)
}

fn bench_reshape(c: &mut Criterion) {
    let rows = row_table(5_000, 20);
    let wide = pivot_to_columns(&rows, "designator", "project", "volume")
        .unwrap()
        .table;

    c.bench_function("pivot_to_columns 5k x 20", |b| {
        b.iter(|| pivot_to_columns(black_box(&rows), "designator", "project", "volume").unwrap())
    });

    c.bench_function("melt_to_rows 5k x 20", |b| {
        b.iter(|| melt_to_rows(black_box(&wide), "designator").unwrap())
    });
}

criterion_group!(benches, bench_reshape);
criterion_main!(benches);
