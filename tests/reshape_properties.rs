use std::collections::{BTreeMap, BTreeSet};

use csv_pivot::reshape::{melt_to_rows, pivot_to_columns, ReshapeWarning};
use csv_pivot::types::{DataType, Schema, Table, Value};
use csv_pivot::ReshapeError;

fn row_table(rows: &[(&str, &str, &str)]) -> Table {
    Table::new(
        Schema::utf8(["designator", "project", "volume"]),
        rows.iter()
            .map(|(d, p, v)| vec![Value::text(*d), Value::text(*p), Value::text(*v)])
            .collect(),
    )
}

fn pivot(t: &Table) -> Table {
    pivot_to_columns(t, "designator", "project", "volume")
        .unwrap()
        .table
}

/// (entity, category, value) triples of a row-format table.
fn triples(t: &Table) -> BTreeSet<(String, String, String)> {
    t.rows
        .iter()
        .map(|r| {
            (
                r[0].as_text().trim().to_string(),
                r[1].as_text().trim().to_string(),
                r[2].as_text(),
            )
        })
        .collect()
}

/// (entity, category) -> value for a column-format table whose first column is the entity.
fn cells(t: &Table) -> BTreeMap<(String, String), Value> {
    let mut out = BTreeMap::new();
    for row in &t.rows {
        for (field, value) in t.schema.fields.iter().zip(row).skip(1) {
            out.insert((row[0].as_text(), field.name.clone()), value.clone());
        }
    }
    out
}

#[test]
fn melt_of_pivot_reproduces_the_triples() {
    let t = row_table(&[
        ("SC-OF-SM-24", "P1", "2"),
        ("OS-SM-1", "P1", "14"),
        ("OS-SM-1", "P2", "13"),
        ("AC-OF-SM-ADSS-12D", "P3", "450"),
        ("SC-OF-SM-24", "P3", "3"),
    ]);

    let wide = pivot(&t);
    let back = melt_to_rows(&wide, "designator").unwrap();

    assert_eq!(triples(&back.table), triples(&t));
    assert!(back.is_clean());
}

#[test]
fn pivot_is_a_fixed_point_through_melt() {
    let t = row_table(&[
        ("B", "Y", "1"),
        ("A", "X", "2"),
        ("C", "X", "0.5"),
        ("A", "Z", "7"),
    ]);

    let first = pivot(&t);
    let melted = melt_to_rows(&first, "designator").unwrap();
    let second = pivot(&melted.table);

    assert_eq!(second.shape(), first.shape());
    assert_eq!(cells(&second), cells(&first));

    let kinds = |t: &Table| -> BTreeMap<String, DataType> {
        t.schema.fields.iter().map(|f| (f.name.clone(), f.data_type)).collect()
    };
    assert_eq!(kinds(&second), kinds(&first));
}

#[test]
fn later_duplicate_row_wins() {
    let t = row_table(&[("A", "X", "5"), ("A", "X", "8")]);
    let out = pivot_to_columns(&t, "designator", "project", "volume").unwrap();

    assert_eq!(out.table.get(0, "X"), Some(&Value::Int64(8)));
    assert!(matches!(out.warnings.as_slice(), [ReshapeWarning::DuplicateKey { row: 3, .. }]));

    let reversed = row_table(&[("A", "X", "8"), ("A", "X", "5")]);
    assert_eq!(pivot(&reversed).get(0, "X"), Some(&Value::Int64(5)));
}

#[test]
fn melt_never_emits_zero_rows() {
    let wide = Table::new(
        Schema::utf8(["designator", "X", "Y", "Z"]),
        vec![
            vec![Value::text("A"), Value::text("0"), Value::text("0.0"), Value::text("-0")],
            vec![Value::text("B"), Value::text("1"), Value::Null, Value::text("0")],
        ],
    );
    let out = melt_to_rows(&wide, "designator").unwrap();

    assert_eq!(out.table.row_count(), 1);
    assert!(out.table.rows.iter().all(|r| r[0] != Value::text("A")));
    assert!(out.table.rows.iter().all(|r| r[2] != Value::Int64(0)));
}

#[test]
fn pivot_shape_is_entities_by_one_plus_categories() {
    let t = row_table(&[("A", "X", "2"), ("A", "Y", "14"), ("B", "X", "1"), ("A", "Z", "0")]);
    let wide = pivot(&t);

    assert_eq!(wide.shape(), (2, 4));
    assert_eq!(wide.column_names(), vec!["designator", "X", "Y", "Z"]);
    assert_eq!(wide.get(1, "designator"), Some(&Value::text("B")));
    assert_eq!(wide.get(1, "Y"), Some(&Value::Int64(0)));
    assert_eq!(wide.get(1, "Z"), Some(&Value::Int64(0)));
}

#[test]
fn non_numeric_value_is_zero_with_exactly_one_warning() {
    let t = row_table(&[("A", "X", "abc"), ("B", "X", "3")]);
    let out = pivot_to_columns(&t, "designator", "project", "volume").unwrap();

    assert_eq!(out.table.get(0, "X"), Some(&Value::Int64(0)));
    assert_eq!(out.warnings.len(), 1);
    let msg = out.warnings[0].to_string();
    assert!(msg.contains("row 2"));
    assert!(msg.contains("'abc'"));
}

#[test]
fn melt_output_is_sorted_and_stable() {
    let wide = Table::new(
        Schema::utf8(["designator", "X", "Y"]),
        vec![
            vec![Value::text("A"), Value::text("5"), Value::text("0")],
            vec![Value::text("B"), Value::text("3"), Value::text("0")],
        ],
    );
    let out = melt_to_rows(&wide, "designator").unwrap();

    assert_eq!(
        out.table.rows,
        vec![
            vec![Value::text("A"), Value::text("X"), Value::Int64(5)],
            vec![Value::text("B"), Value::text("X"), Value::Int64(3)],
        ]
    );
    assert_eq!(melt_to_rows(&wide, "designator").unwrap(), out);
}

#[test]
fn missing_column_fails_without_touching_input() {
    let t = row_table(&[("A", "X", "2")]);
    let before = t.clone();

    let err = pivot_to_columns(&t, "designator", "project", "nonexistent").unwrap_err();
    assert_eq!(err, ReshapeError::MissingColumn("nonexistent".to_string()));
    assert!(!err.is_noop());
    assert_eq!(t, before);
}

#[test]
fn nothing_to_transform_is_a_noop() {
    let empty = row_table(&[]);
    let err = pivot_to_columns(&empty, "designator", "project", "volume").unwrap_err();
    assert!(err.is_noop());

    let only_entity = Table::new(Schema::utf8(["designator"]), vec![vec![Value::text("A")]]);
    let err = melt_to_rows(&only_entity, "designator").unwrap_err();
    assert_eq!(err, ReshapeError::NoCategoryColumns);
    assert!(err.is_noop());
}
