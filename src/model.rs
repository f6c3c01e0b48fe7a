//! Typed order and review records handed to the engine by the ingestion layer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Label used for rows whose product category is missing.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// One order line. An order with several items appears once per item, so
/// `order_id` repeats across rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_date: NaiveDateTime,
    pub customer_unique_id: String,
    pub customer_city: String,
    pub customer_state: String,
    pub seller_id: String,
    pub seller_city: String,
    pub seller_state: String,
    pub product_category: String,
    pub revenue: f64,
}

impl OrderRecord {
    pub fn order_day(&self) -> NaiveDate {
        self.order_date.date()
    }
}

/// One product review, related to orders only through `product_category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub product_category: String,
    pub review_score: f64,
    pub review_date: NaiveDateTime,
}
