//! Integration tests for the contract evaluator.
//!
//! These tests run complete contracts over small order/customer tables, both
//! in memory and from parquet files on disk.

use arrow::array::{
    Array, ArrayRef, Float64Array, RecordBatch, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use ecomdq_core::{
    CheckKind, CheckStatus, ColumnSpecBuilder, DtypeFamily, SchemaContract, TableSpecBuilder,
};
use ecomdq_validator::{ContractEvaluator, InMemorySource, ParquetDirSource};
use parquet::arrow::ArrowWriter;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

fn array<A: Array + 'static>(array: A) -> ArrayRef {
    Arc::new(array)
}

fn batch(columns: Vec<(&str, ArrayRef)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
        .collect();
    let arrays = columns.into_iter().map(|(_, array)| array).collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

fn shop_contract() -> SchemaContract {
    SchemaContract::new(
        "shop",
        vec![
            TableSpecBuilder::new("orders")
                .primary_key(["order_id"])
                .column(
                    ColumnSpecBuilder::new("order_id", DtypeFamily::String)
                        .nullable(false)
                        .build(),
                )
                .column(ColumnSpecBuilder::new("customer_id", DtypeFamily::String).build())
                .foreign_key(["customer_id"], "customers", ["customer_id"])
                .build(),
            TableSpecBuilder::new("customers")
                .primary_key(["customer_id"])
                .column(
                    ColumnSpecBuilder::new("customer_id", DtypeFamily::String)
                        .nullable(false)
                        .build(),
                )
                .build(),
        ],
    )
}

fn orders() -> RecordBatch {
    batch(vec![
        ("order_id", array(StringArray::from(vec!["o1", "o2", "o2"]))),
        ("customer_id", array(StringArray::from(vec!["c1", "c9", "c1"]))),
    ])
}

fn customers() -> RecordBatch {
    batch(vec![(
        "customer_id",
        array(StringArray::from(vec!["c1", "c2"])),
    )])
}

fn shop_source() -> InMemorySource {
    InMemorySource::new()
        .with_table("orders", orders())
        .with_table("customers", customers())
}

#[test]
fn test_orders_customers_scenario() {
    let contract = shop_contract();
    let report = ContractEvaluator::new(&contract, shop_source()).unwrap().run();

    let rows: Vec<(&str, CheckKind, Option<&str>, CheckStatus, &str)> = report
        .results
        .iter()
        .map(|r| {
            (
                r.table.as_str(),
                r.kind,
                r.column.as_deref(),
                r.status,
                r.details.as_str(),
            )
        })
        .collect();

    assert_eq!(
        rows,
        vec![
            ("orders", CheckKind::RequiredColumns, None, CheckStatus::Pass, ""),
            (
                "orders",
                CheckKind::DtypeFamily,
                Some("order_id"),
                CheckStatus::Pass,
                "expected=string actual=string"
            ),
            ("orders", CheckKind::NonNull, Some("order_id"), CheckStatus::Pass, ""),
            (
                "orders",
                CheckKind::DtypeFamily,
                Some("customer_id"),
                CheckStatus::Pass,
                "expected=string actual=string"
            ),
            (
                "orders",
                CheckKind::PrimaryKeyUnique,
                None,
                CheckStatus::Fail,
                "pk=[order_id] duplicate_rows=1"
            ),
            (
                "orders",
                CheckKind::ForeignKeyIntegrity,
                None,
                CheckStatus::Fail,
                "from_cols=[customer_id] to_table=customers orphan_count=1 sample=[{customer_id=c9}]"
            ),
            ("customers", CheckKind::RequiredColumns, None, CheckStatus::Pass, ""),
            (
                "customers",
                CheckKind::DtypeFamily,
                Some("customer_id"),
                CheckStatus::Pass,
                "expected=string actual=string"
            ),
            ("customers", CheckKind::NonNull, Some("customer_id"), CheckStatus::Pass, ""),
            (
                "customers",
                CheckKind::PrimaryKeyUnique,
                None,
                CheckStatus::Pass,
                "pk=[customer_id]"
            ),
        ]
    );
    assert_eq!(report.fail_count, 2);
    assert!(report.clone().into_result().is_err());
}

#[test]
fn test_runs_are_idempotent() {
    let contract = shop_contract();

    let first = ContractEvaluator::new(&contract, shop_source()).unwrap().run();
    let second = ContractEvaluator::new(&contract, shop_source()).unwrap().run();

    assert_eq!(first, second);
}

#[test]
fn test_missing_required_column_does_not_block_other_checks() {
    let contract = SchemaContract::new(
        "shop",
        vec![
            TableSpecBuilder::new("items")
                .column(
                    ColumnSpecBuilder::new("order_id", DtypeFamily::String)
                        .nullable(false)
                        .build(),
                )
                .column(
                    ColumnSpecBuilder::new("price", DtypeFamily::Numeric)
                        .min(0.0)
                        .build(),
                )
                .column(ColumnSpecBuilder::new("seller_id", DtypeFamily::String).build())
                .build(),
        ],
    );
    let source = InMemorySource::new().with_table(
        "items",
        batch(vec![
            ("order_id", array(StringArray::from(vec![Some("o1"), None]))),
            ("price", array(Float64Array::from(vec![10.0, -1.0]))),
        ]),
    );

    let report = ContractEvaluator::new(&contract, source).unwrap().run();
    let rows: Vec<(CheckKind, Option<&str>, CheckStatus)> = report
        .results
        .iter()
        .map(|r| (r.kind, r.column.as_deref(), r.status))
        .collect();

    assert_eq!(
        rows,
        vec![
            (CheckKind::RequiredColumns, None, CheckStatus::Fail),
            (CheckKind::DtypeFamily, Some("order_id"), CheckStatus::Pass),
            (CheckKind::NonNull, Some("order_id"), CheckStatus::Fail),
            (CheckKind::DtypeFamily, Some("price"), CheckStatus::Pass),
            (CheckKind::MinValue, Some("price"), CheckStatus::Fail),
        ]
    );
    assert_eq!(report.results[0].details, "missing=[seller_id]");
    assert_eq!(report.fail_count, 3);
}

#[test]
fn test_dtype_family_mismatch() {
    let contract = SchemaContract::new(
        "shop",
        vec![
            TableSpecBuilder::new("orders")
                .column(
                    ColumnSpecBuilder::new("order_purchase_timestamp", DtypeFamily::Datetime)
                        .build(),
                )
                .column(
                    ColumnSpecBuilder::new("order_approved_at", DtypeFamily::Datetime).build(),
                )
                .build(),
        ],
    );
    let source = InMemorySource::new().with_table(
        "orders",
        batch(vec![
            (
                "order_purchase_timestamp",
                array(TimestampMicrosecondArray::from(vec![1_000_000])),
            ),
            ("order_approved_at", array(StringArray::from(vec!["2017-10-02"]))),
        ]),
    );

    let report = ContractEvaluator::new(&contract, source).unwrap().run();

    assert_eq!(report.fail_count, 1);
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.column.as_deref(), Some("order_approved_at"));
    assert_eq!(
        failure.details,
        format!(
            "expected=datetime actual=string storage_type={}",
            DataType::Utf8
        )
    );
}

fn write_parquet(dir: &Path, name: &str, batch: &RecordBatch) {
    let file = File::create(dir.join(name)).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn test_parquet_directory_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    write_parquet(dir.path(), "orders", &orders());

    let contract = shop_contract();
    let report = ContractEvaluator::new(&contract, ParquetDirSource::new(dir.path()))
        .unwrap()
        .run();

    let fk = report
        .results
        .iter()
        .find(|r| r.table == "orders" && r.kind == CheckKind::ForeignKeyTargetLoad)
        .unwrap();
    assert!(fk.details.starts_with("to_table=customers error=Missing clean file: "));

    let customer_rows = report.for_table("customers").collect::<Vec<_>>();
    assert_eq!(customer_rows.len(), 1);
    assert_eq!(customer_rows[0].kind, CheckKind::TableExistsAndReadable);

    write_parquet(dir.path(), "customers", &customers());
    let report = ContractEvaluator::new(&contract, ParquetDirSource::new(dir.path()))
        .unwrap()
        .run();
    let expected = ContractEvaluator::new(&contract, shop_source()).unwrap().run();
    assert_eq!(report, expected);
}
