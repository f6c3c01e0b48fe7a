//! Reading order and review CSV exports into typed records.
//!
//! This is the only place raw text is interpreted. Malformed timestamps are
//! reported as [`AnalyticsError::Parse`] with the offending line, so the
//! engine only ever sees well-typed records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::model::{OrderRecord, ReviewRecord, UNKNOWN_CATEGORY};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

#[derive(Debug, Deserialize)]
struct RawOrder {
    order_id: String,
    order_date: String,
    customer_unique_id: String,
    customer_city: String,
    customer_state: String,
    seller_id: String,
    seller_city: String,
    seller_state: String,
    #[serde(default)]
    product_category: Option<String>,
    revenue: f64,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    #[serde(default)]
    product_category: Option<String>,
    review_score: f64,
    #[serde(alias = "order_date")]
    review_date: String,
}

/// Parses `YYYY-MM-DD HH:MM:SS` (space or `T` separated, optional fraction)
/// or a bare `YYYY-MM-DD`, which is read as midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
        })
}

fn timestamp_field(value: &str, line: u64, field: &'static str) -> Result<NaiveDateTime> {
    parse_timestamp(value).ok_or_else(|| AnalyticsError::Parse {
        line,
        field,
        message: format!("unrecognised timestamp `{}`", value.trim()),
    })
}

fn category(raw: Option<String>) -> String {
    match raw {
        Some(value) if !value.is_empty() => value,
        _ => UNKNOWN_CATEGORY.to_string(),
    }
}

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source)
}

/// Reads order lines from CSV with a header row. Fields are trimmed before
/// they are typed, so padded numbers parse.
pub fn read_orders<R: Read>(source: R) -> Result<Vec<OrderRecord>> {
    let mut reader = csv_reader(source);
    let headers = reader.headers()?.clone();

    let mut orders = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let line = index as u64 + 1;
        let raw: RawOrder = row.deserialize(Some(&headers))?;
        let order_date = timestamp_field(&raw.order_date, line, "order_date")?;

        orders.push(OrderRecord {
            order_id: raw.order_id,
            order_date,
            customer_unique_id: raw.customer_unique_id,
            customer_city: raw.customer_city,
            customer_state: raw.customer_state,
            seller_id: raw.seller_id,
            seller_city: raw.seller_city,
            seller_state: raw.seller_state,
            product_category: category(raw.product_category),
            revenue: raw.revenue,
        });
    }

    debug!(rows = orders.len(), "read orders");
    Ok(orders)
}

/// Reads reviews from CSV with a header row. The timestamp column may be
/// named `review_date` or `order_date`.
pub fn read_reviews<R: Read>(source: R) -> Result<Vec<ReviewRecord>> {
    let mut reader = csv_reader(source);
    let headers = reader.headers()?.clone();

    let mut reviews = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let line = index as u64 + 1;
        let raw: RawReview = row.deserialize(Some(&headers))?;
        let review_date = timestamp_field(&raw.review_date, line, "review_date")?;

        reviews.push(ReviewRecord {
            product_category: category(raw.product_category),
            review_score: raw.review_score,
            review_date,
        });
    }

    debug!(rows = reviews.len(), "read reviews");
    Ok(reviews)
}

pub fn load_orders(path: &Path) -> Result<Vec<OrderRecord>> {
    let file = File::open(path).map_err(|e| AnalyticsError::io(path, e))?;
    read_orders(file)
}

pub fn load_reviews(path: &Path) -> Result<Vec<ReviewRecord>> {
    let file = File::open(path).map_err(|e| AnalyticsError::io(path, e))?;
    read_reviews(file)
}
