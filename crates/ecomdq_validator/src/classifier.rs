//! Type-family classification of Arrow storage types.
//!
//! Contracts speak in logical families ([`DtypeFamily`]); loaded tables carry
//! Arrow [`DataType`]s. [`classify`] bridges the two and is total: storage
//! types outside the three families come back as [`ObservedFamily::Other`]
//! carrying the type's own name.

use arrow::datatypes::DataType;
use ecomdq_core::DtypeFamily;
use std::fmt;

/// Family observed for a column of loaded data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObservedFamily {
    /// One of the contract families
    Family(DtypeFamily),
    /// Any other storage type, named after it
    Other(String),
}

impl ObservedFamily {
    /// Returns the family name; never empty.
    pub fn as_str(&self) -> &str {
        match self {
            ObservedFamily::Family(family) => family.as_str(),
            ObservedFamily::Other(name) if name.is_empty() => "unknown",
            ObservedFamily::Other(name) => name,
        }
    }

    /// Returns true if this is the given contract family.
    pub fn matches(&self, expected: DtypeFamily) -> bool {
        matches!(self, ObservedFamily::Family(family) if *family == expected)
    }
}

impl fmt::Display for ObservedFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an Arrow storage type to its logical family.
///
/// Dictionary and run-end encoded columns classify as their value type, so a
/// categorical text column is `string`.
pub fn classify(data_type: &DataType) -> ObservedFamily {
    use ObservedFamily::Family;

    match data_type {
        DataType::Date32
        | DataType::Date64
        | DataType::Timestamp(_, _)
        | DataType::Time32(_)
        | DataType::Time64(_) => Family(DtypeFamily::Datetime),

        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal32(_, _)
        | DataType::Decimal64(_, _)
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => Family(DtypeFamily::Numeric),

        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            Family(DtypeFamily::String)
        }

        DataType::Dictionary(_, values) => classify(values),
        DataType::RunEndEncoded(_, values) => classify(values.data_type()),

        other => ObservedFamily::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, IntervalUnit, TimeUnit};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_datetime_types() {
        for dt in [
            DataType::Date32,
            DataType::Date64,
            DataType::Timestamp(TimeUnit::Microsecond, None),
            DataType::Timestamp(TimeUnit::Nanosecond, Some("UTC".into())),
            DataType::Time64(TimeUnit::Nanosecond),
        ] {
            assert_eq!(classify(&dt), ObservedFamily::Family(DtypeFamily::Datetime));
        }
    }

    #[test]
    fn test_numeric_types() {
        for dt in [
            DataType::Int8,
            DataType::Int64,
            DataType::UInt32,
            DataType::Float32,
            DataType::Float64,
            DataType::Decimal128(10, 2),
        ] {
            assert_eq!(classify(&dt).as_str(), "numeric");
        }
    }

    #[test]
    fn test_string_and_dictionary_types() {
        assert_eq!(classify(&DataType::Utf8).as_str(), "string");
        assert_eq!(classify(&DataType::LargeUtf8).as_str(), "string");
        assert_eq!(classify(&DataType::Utf8View).as_str(), "string");

        let dict = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
        assert!(classify(&dict).matches(DtypeFamily::String));
    }

    #[test]
    fn test_other_types_are_named() {
        let cases = [
            DataType::Boolean,
            DataType::Null,
            DataType::Binary,
            DataType::Duration(TimeUnit::Second),
            DataType::Interval(IntervalUnit::DayTime),
            DataType::List(Arc::new(Field::new("item", DataType::Int64, true))),
        ];
        for dt in cases {
            let observed = classify(&dt);
            assert!(matches!(observed, ObservedFamily::Other(_)), "{dt}");
            assert!(!observed.as_str().is_empty());
            assert!(!observed.matches(DtypeFamily::String));
        }
        assert_eq!(classify(&DataType::Boolean).as_str(), DataType::Boolean.to_string());
    }
}
