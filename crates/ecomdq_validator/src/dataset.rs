//! Loaded table data and cell values.
//!
//! A [`TableData`] is a read-only snapshot of one table held as a single
//! Arrow [`RecordBatch`]. Checks that look at individual cells go through
//! [`column_values`], which turns any Arrow column into a vector of
//! [`DataValue`]s.

use arrow::array::{Array, ArrayRef, AsArray, RecordBatch};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{
    DataType, Float64Type, Int64Type, SchemaRef, TimeUnit, TimestampMicrosecondType, UInt64Type,
};
use arrow::error::ArrowError;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single cell value.
///
/// NaN floats are read as [`DataValue::Null`], so "null" below always means
/// Arrow null or NaN.
#[derive(Debug, Clone)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Timestamp value (microseconds since the Unix epoch, no time zone)
    Timestamp(i64),
}

impl DataValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::String(_) => "string",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::Bool(_) => "boolean",
            DataValue::Timestamp(_) => "timestamp",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Int(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Normalizes a value for key comparison.
    ///
    /// Integral floats become integers so that a key stored as `1.0` on one
    /// side matches `1` on the other.
    pub fn into_key(self) -> Self {
        match self {
            // below 2^53 every integral float is exact
            DataValue::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => DataValue::Int(f as i64),
            other => other,
        }
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataValue::Null, DataValue::Null) => true,
            (DataValue::String(a), DataValue::String(b)) => a == b,
            (DataValue::Int(a), DataValue::Int(b)) => a == b,
            (DataValue::Float(a), DataValue::Float(b)) => a.to_bits() == b.to_bits(),
            (DataValue::Bool(a), DataValue::Bool(b)) => a == b,
            (DataValue::Timestamp(a), DataValue::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for DataValue {}

impl Hash for DataValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            DataValue::Null => {}
            DataValue::String(s) => s.hash(state),
            DataValue::Int(i) => i.hash(state),
            DataValue::Float(f) => f.to_bits().hash(state),
            DataValue::Bool(b) => b.hash(state),
            DataValue::Timestamp(t) => t.hash(state),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => f.write_str("null"),
            DataValue::String(s) => f.write_str(s),
            DataValue::Int(i) => write!(f, "{i}"),
            DataValue::Float(v) => write!(f, "{v}"),
            DataValue::Bool(b) => write!(f, "{b}"),
            DataValue::Timestamp(micros) => match chrono::DateTime::from_timestamp_micros(*micros) {
                Some(ts) => write!(f, "{}", ts.naive_utc().format("%Y-%m-%d %H:%M:%S%.f")),
                None => write!(f, "{micros}"),
            },
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        if f.is_nan() {
            DataValue::Null
        } else {
            DataValue::Float(f)
        }
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

fn downcast_failed(expected: &str, actual: &DataType) -> ArrowError {
    ArrowError::CastError(format!("expected {expected} array, found {actual}"))
}

/// Converts an Arrow column into cell values, one per row.
///
/// Integers of any width become [`DataValue::Int`] (unsigned values beyond
/// `i64::MAX` become floats), floats and decimals become [`DataValue::Float`],
/// dates and timestamps become [`DataValue::Timestamp`], text stays text.
/// Types without a dedicated value are rendered as text.
pub fn column_values(array: &dyn Array) -> Result<Vec<DataValue>, ArrowError> {
    let data_type = array.data_type();
    match data_type {
        DataType::Null => Ok(vec![DataValue::Null; array.len()]),
        DataType::Boolean => {
            let bools = array
                .as_boolean_opt()
                .ok_or_else(|| downcast_failed("boolean", data_type))?;
            Ok(bools.iter().map(DataValue::from).collect())
        }
        DataType::Utf8 => {
            let strings = array
                .as_string_opt::<i32>()
                .ok_or_else(|| downcast_failed("utf8", data_type))?;
            Ok(strings.iter().map(DataValue::from).collect())
        }
        DataType::LargeUtf8 => {
            let strings = array
                .as_string_opt::<i64>()
                .ok_or_else(|| downcast_failed("large utf8", data_type))?;
            Ok(strings.iter().map(DataValue::from).collect())
        }
        DataType::Utf8View => {
            let strings = array
                .as_string_view_opt()
                .ok_or_else(|| downcast_failed("utf8 view", data_type))?;
            Ok(strings.iter().map(DataValue::from).collect())
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let ints = cast(array, &DataType::Int64)?;
            let ints = ints
                .as_primitive_opt::<Int64Type>()
                .ok_or_else(|| downcast_failed("int64", data_type))?;
            Ok(ints.iter().map(DataValue::from).collect())
        }
        DataType::UInt64 => {
            let ints = array
                .as_primitive_opt::<UInt64Type>()
                .ok_or_else(|| downcast_failed("uint64", data_type))?;
            Ok(ints
                .iter()
                .map(|v| match v {
                    None => DataValue::Null,
                    Some(v) => i64::try_from(v).map_or(DataValue::Float(v as f64), DataValue::Int),
                })
                .collect())
        }
        DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal32(_, _)
        | DataType::Decimal64(_, _)
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => {
            let floats = cast(array, &DataType::Float64)?;
            let floats = floats
                .as_primitive_opt::<Float64Type>()
                .ok_or_else(|| downcast_failed("float64", data_type))?;
            Ok(floats.iter().map(DataValue::from).collect())
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            let stamps = cast(array, &DataType::Timestamp(TimeUnit::Microsecond, None))?;
            let stamps = stamps
                .as_primitive_opt::<TimestampMicrosecondType>()
                .ok_or_else(|| downcast_failed("timestamp", data_type))?;
            Ok(stamps
                .iter()
                .map(|v| v.map_or(DataValue::Null, DataValue::Timestamp))
                .collect())
        }
        DataType::Dictionary(_, values) => {
            let decoded = cast(array, values)?;
            column_values(decoded.as_ref())
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            Ok((0..array.len())
                .map(|i| {
                    if array.is_null(i) {
                        DataValue::Null
                    } else {
                        DataValue::String(formatter.value(i).to_string())
                    }
                })
                .collect())
        }
    }
}

/// A loaded, read-only table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    name: String,
    batch: RecordBatch,
}

impl TableData {
    /// Wraps a record batch.
    pub fn new(name: impl Into<String>, batch: RecordBatch) -> Self {
        Self {
            name: name.into(),
            batch,
        }
    }

    /// Combines several batches sharing `schema` into one table.
    pub fn from_batches(
        name: impl Into<String>,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<Self, ArrowError> {
        let batch = concat_batches(&schema, batches)?;
        Ok(Self::new(name, batch))
    }

    /// Table identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying record batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Arrow schema of the table.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Column names in storage order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Returns true if the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema_ref().index_of(name).is_ok()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    /// Storage type of a column.
    pub fn data_type(&self, name: &str) -> Option<&DataType> {
        self.batch
            .schema_ref()
            .field_with_name(name)
            .ok()
            .map(|f| f.data_type())
    }

    /// Cell values of a column, if present.
    pub fn values(&self, name: &str) -> Option<Result<Vec<DataValue>, ArrowError>> {
        self.column(name).map(|array| column_values(array.as_ref()))
    }

    /// Row-wise key tuples over `columns`, normalized for comparison.
    ///
    /// Every named column must exist; callers check presence first.
    pub fn key_rows(&self, columns: &[String]) -> Result<Vec<Vec<DataValue>>, ArrowError> {
        let mut keys: Vec<Vec<DataValue>> = vec![Vec::with_capacity(columns.len()); self.num_rows()];
        for name in columns {
            let array = self
                .column(name)
                .ok_or_else(|| ArrowError::SchemaError(format!("column '{name}' not found")))?;
            for (key, value) in keys.iter_mut().zip(column_values(array.as_ref())?) {
                key.push(value.into_key());
            }
        }
        Ok(keys)
    }
}
