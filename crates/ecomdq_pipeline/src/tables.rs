//! The fixed list of Olist source tables and file naming helpers.

use std::path::Path;

/// Raw CSV files every run expects, in processing order.
pub const RAW_FILES: [&str; 9] = [
    "olist_orders_dataset.csv",
    "olist_order_items_dataset.csv",
    "olist_order_payments_dataset.csv",
    "olist_order_reviews_dataset.csv",
    "olist_products_dataset.csv",
    "olist_customers_dataset.csv",
    "olist_sellers_dataset.csv",
    "olist_geolocation_dataset.csv",
    "product_category_name_translation.csv",
];

/// File name without its extension.
pub fn file_stem(file: &str) -> &str {
    Path::new(file)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file)
}

/// Parquet file name for a raw CSV (`orders.csv` becomes `orders.parquet`).
pub fn parquet_name(file: &str) -> String {
    format!("{}.parquet", file_stem(file))
}

/// Parquet names of all source tables, in processing order.
pub fn parquet_names() -> Vec<String> {
    RAW_FILES.iter().map(|file| parquet_name(file)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecomdq_core::olist_contract;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_naming() {
        assert_eq!(file_stem("olist_orders_dataset.csv"), "olist_orders_dataset");
        assert_eq!(
            parquet_name("product_category_name_translation.csv"),
            "product_category_name_translation.parquet"
        );
        assert_eq!(file_stem("no_extension"), "no_extension");
    }

    #[test]
    fn test_every_contract_table_has_a_source_file() {
        let names = parquet_names();
        let contract = olist_contract();
        for table in contract.table_names() {
            assert!(names.iter().any(|n| n == table), "no source for {table}");
        }
        assert_eq!(names.len(), contract.tables.len());
    }
}
