//! Built-in contract for the Olist e-commerce tables.
//!
//! Dimension tables come first, then fact tables, so that report order reads
//! from referenced tables to referencing ones. Some nulls are meaningful:
//! approval and delivery timestamps are absent for orders that never got
//! that far, and product categories are missing in the raw data.

use crate::{ColumnSpecBuilder, DtypeFamily, SchemaContract, TableSpec, TableSpecBuilder};

pub const CUSTOMERS: &str = "olist_customers_dataset.parquet";
pub const SELLERS: &str = "olist_sellers_dataset.parquet";
pub const PRODUCTS: &str = "olist_products_dataset.parquet";
pub const CATEGORY_TRANSLATION: &str = "product_category_name_translation.parquet";
pub const GEOLOCATION: &str = "olist_geolocation_dataset.parquet";
pub const ORDERS: &str = "olist_orders_dataset.parquet";
pub const ORDER_ITEMS: &str = "olist_order_items_dataset.parquet";
pub const ORDER_PAYMENTS: &str = "olist_order_payments_dataset.parquet";
pub const ORDER_REVIEWS: &str = "olist_order_reviews_dataset.parquet";

/// Order lifecycle states present in the source system.
pub const ORDER_STATUSES: [&str; 8] = [
    "created",
    "approved",
    "invoiced",
    "processing",
    "shipped",
    "delivered",
    "canceled",
    "unavailable",
];

use DtypeFamily::{Datetime, Numeric, String as Str};

fn required(name: &str, family: DtypeFamily) -> crate::ColumnSpec {
    ColumnSpecBuilder::new(name, family).nullable(false).build()
}

fn nullable(name: &str, family: DtypeFamily) -> crate::ColumnSpec {
    ColumnSpecBuilder::new(name, family).build()
}

/// Returns the contract for the nine clean Olist tables.
pub fn olist_contract() -> SchemaContract {
    SchemaContract::new(
        "olist",
        vec![
            customers(),
            sellers(),
            products(),
            category_translation(),
            geolocation(),
            orders(),
            order_items(),
            order_payments(),
            order_reviews(),
        ],
    )
}

fn customers() -> TableSpec {
    TableSpecBuilder::new(CUSTOMERS)
        .primary_key(["customer_id"])
        .column(required("customer_id", Str))
        .column(required("customer_unique_id", Str))
        // text keeps leading zeros
        .column(required("customer_zip_code_prefix", Str))
        .column(required("customer_city", Str))
        .column(required("customer_state", Str))
        .build()
}

fn sellers() -> TableSpec {
    TableSpecBuilder::new(SELLERS)
        .primary_key(["seller_id"])
        .column(required("seller_id", Str))
        .column(required("seller_zip_code_prefix", Str))
        .column(required("seller_city", Str))
        .column(required("seller_state", Str))
        .build()
}

fn products() -> TableSpec {
    TableSpecBuilder::new(PRODUCTS)
        .primary_key(["product_id"])
        .column(required("product_id", Str))
        .column(nullable("product_category_name", Str))
        .column(nullable("product_name_length", Numeric))
        .column(nullable("product_description_length", Numeric))
        .column(nullable("product_photos_qty", Numeric))
        .column(nullable("product_weight_g", Numeric))
        .column(nullable("product_length_cm", Numeric))
        .column(nullable("product_height_cm", Numeric))
        .column(nullable("product_width_cm", Numeric))
        .build()
}

fn category_translation() -> TableSpec {
    TableSpecBuilder::new(CATEGORY_TRANSLATION)
        .primary_key(["product_category_name"])
        .column(required("product_category_name", Str))
        .column(required("product_category_name_english", Str))
        .build()
}

fn geolocation() -> TableSpec {
    // many rows per zip prefix, no natural key
    TableSpecBuilder::new(GEOLOCATION)
        .column(required("geolocation_zip_code_prefix", Str))
        .column(required("geolocation_lat", Numeric))
        .column(required("geolocation_lng", Numeric))
        .column(required("geolocation_city", Str))
        .column(required("geolocation_state", Str))
        .build()
}

fn orders() -> TableSpec {
    TableSpecBuilder::new(ORDERS)
        .primary_key(["order_id"])
        .column(required("order_id", Str))
        .column(required("customer_id", Str))
        .column(
            ColumnSpecBuilder::new("order_status", Str)
                .nullable(false)
                .allowed_values(ORDER_STATUSES)
                .build(),
        )
        .column(required("order_purchase_timestamp", Datetime))
        .column(nullable("order_approved_at", Datetime))
        .column(nullable("order_delivered_carrier_date", Datetime))
        .column(nullable("order_delivered_customer_date", Datetime))
        .column(required("order_estimated_delivery_date", Datetime))
        .foreign_key(["customer_id"], CUSTOMERS, ["customer_id"])
        .build()
}

fn order_items() -> TableSpec {
    TableSpecBuilder::new(ORDER_ITEMS)
        .primary_key(["order_id", "order_item_id"])
        .column(required("order_id", Str))
        .column(required("order_item_id", Numeric))
        .column(required("product_id", Str))
        .column(required("seller_id", Str))
        .column(required("shipping_limit_date", Datetime))
        .column(
            ColumnSpecBuilder::new("price", Numeric)
                .nullable(false)
                .min(0.0)
                .build(),
        )
        .column(
            ColumnSpecBuilder::new("freight_value", Numeric)
                .nullable(false)
                .min(0.0)
                .build(),
        )
        .foreign_key(["order_id"], ORDERS, ["order_id"])
        .foreign_key(["product_id"], PRODUCTS, ["product_id"])
        .foreign_key(["seller_id"], SELLERS, ["seller_id"])
        .build()
}

fn order_payments() -> TableSpec {
    TableSpecBuilder::new(ORDER_PAYMENTS)
        .primary_key(["order_id", "payment_sequential"])
        .column(required("order_id", Str))
        .column(required("payment_sequential", Numeric))
        .column(required("payment_type", Str))
        .column(
            ColumnSpecBuilder::new("payment_installments", Numeric)
                .nullable(false)
                .min(0.0)
                .build(),
        )
        .column(
            ColumnSpecBuilder::new("payment_value", Numeric)
                .nullable(false)
                .min(0.0)
                .build(),
        )
        .foreign_key(["order_id"], ORDERS, ["order_id"])
        .build()
}

fn order_reviews() -> TableSpec {
    TableSpecBuilder::new(ORDER_REVIEWS)
        .primary_key(["order_id", "review_id"])
        .column(required("review_id", Str))
        .column(required("order_id", Str))
        .column(
            ColumnSpecBuilder::new("review_score", Numeric)
                .nullable(false)
                .min(1.0)
                .max(5.0)
                .build(),
        )
        .column(nullable("review_comment_title", Str))
        .column(nullable("review_comment_message", Str))
        .column(required("review_creation_date", Datetime))
        .column(required("review_answer_timestamp", Datetime))
        .foreign_key(["order_id"], ORDERS, ["order_id"])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_olist_contract_is_well_formed() {
        let contract = olist_contract();
        assert_eq!(contract.tables.len(), 9);
        assert!(contract.validate_definition().is_empty());
        assert!(contract.dangling_references().is_empty());
    }

    #[test]
    fn test_geolocation_has_no_primary_key() {
        let contract = olist_contract();
        assert_eq!(contract.table(GEOLOCATION).unwrap().primary_key, None);
    }

    #[test]
    fn test_order_items_keys() {
        let contract = olist_contract();
        let items = contract.table(ORDER_ITEMS).unwrap();

        assert_eq!(
            items.primary_key.as_deref(),
            Some(&["order_id".to_string(), "order_item_id".to_string()][..])
        );
        let targets: Vec<&str> = items.foreign_keys.iter().map(|fk| fk.to_table.as_str()).collect();
        assert_eq!(targets, vec![ORDERS, PRODUCTS, SELLERS]);
    }

    #[test]
    fn test_meaningful_nulls_are_nullable() {
        let contract = olist_contract();
        let orders = contract.table(ORDERS).unwrap();

        assert!(orders.column("order_approved_at").unwrap().nullable);
        assert!(orders.column("order_delivered_customer_date").unwrap().nullable);
        assert!(!orders.column("order_purchase_timestamp").unwrap().nullable);
    }
}
