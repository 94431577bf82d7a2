//! Type enforcement of interim tables into clean parquet.
//!
//! Each table has a [`CastRule`] naming the columns that must end up as
//! text, timestamps or numbers. Values that cannot be parsed become nulls;
//! numeric columns are stored as `Int64` when every value is an integer and
//! as `Float64` otherwise.

use crate::io::write_parquet;
use crate::standardize::rename_columns;
use crate::tables::parquet_names;
use crate::{PipelineError, Result};
use arrow::array::{Array, ArrayRef, RecordBatch};
use arrow::compute::{CastOptions, cast_with_options};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::error::ArrowError;
use ecomdq_core::DtypeFamily;
use ecomdq_core::olist::{
    CATEGORY_TRANSLATION, CUSTOMERS, GEOLOCATION, ORDER_ITEMS, ORDER_PAYMENTS, ORDER_REVIEWS,
    ORDERS, PRODUCTS, SELLERS,
};
use ecomdq_validator::read_parquet_table;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Columns of one table grouped by target type family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastRule {
    /// Table the rule applies to
    pub table: &'static str,
    /// Columns stored as text
    pub string_cols: &'static [&'static str],
    /// Columns parsed as timestamps
    pub datetime_cols: &'static [&'static str],
    /// Columns parsed as numbers
    pub numeric_cols: &'static [&'static str],
}

impl CastRule {
    /// Every ruled column with its target family: strings, then datetimes,
    /// then numerics.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, DtypeFamily)> + '_ {
        let strings = self.string_cols.iter().map(|c| (*c, DtypeFamily::String));
        let datetimes = self.datetime_cols.iter().map(|c| (*c, DtypeFamily::Datetime));
        let numerics = self.numeric_cols.iter().map(|c| (*c, DtypeFamily::Numeric));
        strings.chain(datetimes).chain(numerics)
    }

    /// Target family of a column, if the rule names it.
    pub fn family_of(&self, column: &str) -> Option<DtypeFamily> {
        self.columns()
            .find(|(name, _)| *name == column)
            .map(|(_, family)| family)
    }
}

/// Cast rules for the Olist tables.
pub const CAST_RULES: [CastRule; 9] = [
    CastRule {
        table: CUSTOMERS,
        string_cols: &["customer_id", "customer_unique_id", "customer_zip_code_prefix"],
        datetime_cols: &[],
        numeric_cols: &[],
    },
    CastRule {
        table: GEOLOCATION,
        string_cols: &["geolocation_zip_code_prefix"],
        datetime_cols: &[],
        numeric_cols: &["geolocation_lat", "geolocation_lng"],
    },
    CastRule {
        table: ORDER_ITEMS,
        string_cols: &["order_id", "product_id", "seller_id"],
        datetime_cols: &["shipping_limit_date"],
        numeric_cols: &["order_item_id", "price", "freight_value"],
    },
    CastRule {
        table: ORDER_PAYMENTS,
        string_cols: &["order_id"],
        datetime_cols: &[],
        numeric_cols: &["payment_installments", "payment_value", "payment_sequential"],
    },
    CastRule {
        table: ORDER_REVIEWS,
        string_cols: &["review_id", "order_id"],
        datetime_cols: &["review_creation_date", "review_answer_timestamp"],
        numeric_cols: &["review_score"],
    },
    CastRule {
        table: ORDERS,
        string_cols: &["order_id", "customer_id", "order_status"],
        datetime_cols: &[
            "order_purchase_timestamp",
            "order_approved_at",
            "order_delivered_carrier_date",
            "order_delivered_customer_date",
            "order_estimated_delivery_date",
        ],
        numeric_cols: &[],
    },
    CastRule {
        table: PRODUCTS,
        string_cols: &["product_id", "product_category_name"],
        datetime_cols: &[],
        numeric_cols: &[
            "product_name_length",
            "product_description_length",
            "product_photos_qty",
            "product_weight_g",
            "product_length_cm",
            "product_height_cm",
            "product_width_cm",
        ],
    },
    CastRule {
        table: SELLERS,
        string_cols: &["seller_id", "seller_zip_code_prefix"],
        datetime_cols: &[],
        numeric_cols: &[],
    },
    CastRule {
        table: CATEGORY_TRANSLATION,
        string_cols: &["product_category_name", "product_category_name_english"],
        datetime_cols: &[],
        numeric_cols: &[],
    },
];

/// Column renames applied to the products table before casting.
pub const PRODUCT_RENAMES: [(&str, &str); 2] = [
    ("product_name_lenght", "product_name_length"),
    ("product_description_lenght", "product_description_length"),
];

/// Looks up the cast rule for a table.
pub fn cast_rule(table: &str) -> Option<&'static CastRule> {
    CAST_RULES.iter().find(|rule| rule.table == table)
}

fn rename_for(table: &str, column: &str) -> String {
    if table == PRODUCTS {
        if let Some((_, to)) = PRODUCT_RENAMES.iter().find(|(from, _)| *from == column) {
            return to.to_string();
        }
    }
    column.to_string()
}

fn safe_cast(array: &ArrayRef, to: &DataType) -> std::result::Result<ArrayRef, ArrowError> {
    let options = CastOptions {
        safe: true,
        ..Default::default()
    };
    cast_with_options(array, to, &options)
}

/// Casts one column to the physical type of `family`.
///
/// Numeric columns become `Int64` unless that would turn a present value
/// into a null, in which case they become `Float64`.
pub fn cast_column(
    array: &ArrayRef,
    family: DtypeFamily,
) -> std::result::Result<ArrayRef, ArrowError> {
    match family {
        DtypeFamily::String => safe_cast(array, &DataType::Utf8),
        DtypeFamily::Datetime => {
            safe_cast(array, &DataType::Timestamp(TimeUnit::Microsecond, None))
        }
        DtypeFamily::Numeric => {
            let ints = safe_cast(array, &DataType::Int64)?;
            if ints.logical_null_count() == array.logical_null_count() {
                Ok(ints)
            } else {
                safe_cast(array, &DataType::Float64)
            }
        }
    }
}

/// Applies the rename map and cast rule of `table` to a batch.
///
/// Columns the rule does not name are kept as they are; ruled columns the
/// batch lacks are skipped.
pub fn enforce_table(table: &str, batch: &RecordBatch) -> Result<RecordBatch> {
    let batch = rename_columns(batch, |column| rename_for(table, column))?;
    let Some(rule) = cast_rule(table) else {
        return Ok(batch);
    };

    let schema = batch.schema();
    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut columns = Vec::with_capacity(batch.num_columns());

    for (field, array) in schema.fields().iter().zip(batch.columns()) {
        let array = match rule.family_of(field.name()) {
            Some(family) => cast_column(array, family).map_err(|e| PipelineError::Cast {
                table: table.to_string(),
                column: field.name().clone(),
                message: e.to_string(),
            })?,
            None => Arc::clone(array),
        };
        debug!("{}.{} -> {}", table, field.name(), array.data_type());
        fields.push(Field::new(field.name(), array.data_type().clone(), true));
        columns.push(array);
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Enforces types on every interim table and writes `<clean_dir>/<name>`.
///
/// Stops at the first failure.
pub fn enforce(interim_dir: &Path, clean_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for name in parquet_names() {
        info!("Processing {}", name);
        let path = interim_dir.join(&name);
        let interim =
            read_parquet_table(&name, &path).map_err(|e| PipelineError::read(&path, e))?;

        let clean = enforce_table(&name, interim.batch())?;

        let out = clean_dir.join(&name);
        write_parquet(&out, &clean)?;
        info!("Wrote {}", out.display());
        written.push(out);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{AsArray, StringArray};
    use arrow::datatypes::{Float64Type, Int64Type, TimestampMicrosecondType};
    use ecomdq_core::olist_contract;
    use pretty_assertions::assert_eq;

    fn text_batch(columns: Vec<(&str, Vec<Option<&str>>)>) -> RecordBatch {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
            .collect();
        let arrays: Vec<ArrayRef> = columns
            .into_iter()
            .map(|(_, values)| Arc::new(StringArray::from(values)) as ArrayRef)
            .collect();
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
    }

    #[test]
    fn test_every_table_has_a_rule() {
        for name in parquet_names() {
            assert!(cast_rule(&name).is_some(), "no cast rule for {name}");
        }
    }

    #[test]
    fn test_rules_agree_with_contract_families() {
        let contract = olist_contract();
        for rule in &CAST_RULES {
            let table = contract.table(rule.table).unwrap();
            for (column, family) in rule.columns() {
                if let Some(spec) = table.column(column) {
                    assert_eq!(spec.dtype_family, family, "{}.{}", rule.table, column);
                }
            }
        }
    }

    #[test]
    fn test_integer_column_becomes_int64() {
        let batch = text_batch(vec![
            ("order_id", vec![Some("o1"), Some("o1")]),
            ("order_item_id", vec![Some("1"), Some("2")]),
            ("price", vec![Some("10.5"), None]),
            ("shipping_limit_date", vec![Some("2017-09-19 09:45:35"), Some("garbage")]),
        ]);

        let clean = enforce_table(ORDER_ITEMS, &batch).unwrap();
        let schema = clean.schema();

        assert_eq!(schema.field(1).data_type(), &DataType::Int64);
        assert_eq!(clean.column(1).as_primitive::<Int64Type>().value(1), 2);

        assert_eq!(schema.field(2).data_type(), &DataType::Float64);
        assert_eq!(clean.column(2).as_primitive::<Float64Type>().value(0), 10.5);
        assert!(clean.column(2).is_null(1));

        assert_eq!(
            schema.field(3).data_type(),
            &DataType::Timestamp(TimeUnit::Microsecond, None)
        );
        let dates = clean.column(3).as_primitive::<TimestampMicrosecondType>();
        assert!(dates.is_valid(0));
        assert!(dates.is_null(1));
    }

    #[test]
    fn test_unparseable_numbers_become_null_floats() {
        let batch = text_batch(vec![("review_score", vec![Some("5"), Some("n/a")])]);

        let clean = enforce_table(ORDER_REVIEWS, &batch).unwrap();
        let scores = clean.column(0).as_primitive::<Float64Type>();

        assert_eq!(scores.value(0), 5.0);
        assert!(scores.is_null(1));
    }

    #[test]
    fn test_products_rename_before_cast() {
        let batch = text_batch(vec![
            ("product_id", vec![Some("p1")]),
            ("product_name_lenght", vec![Some("40")]),
            ("extra", vec![Some("kept")]),
        ]);

        let clean = enforce_table(PRODUCTS, &batch).unwrap();
        let schema = clean.schema();

        assert_eq!(schema.field(1).name(), "product_name_length");
        assert_eq!(schema.field(1).data_type(), &DataType::Int64);
        assert_eq!(schema.field(2).data_type(), &DataType::Utf8);
    }

    #[test]
    fn test_rename_only_applies_to_products() {
        let batch = text_batch(vec![("product_name_lenght", vec![Some("1")])]);
        let clean = enforce_table(SELLERS, &batch).unwrap();
        assert_eq!(clean.schema().field(0).name(), "product_name_lenght");
    }
}
