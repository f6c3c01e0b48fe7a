//! Per-customer recency, frequency and monetary metrics.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::model::OrderRecord;
use crate::rank::{Ranked, SortOrder, Table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmRow {
    pub customer_unique_id: String,
    /// Distinct orders placed by the customer.
    pub frequency: u64,
    /// Revenue summed over every line of the customer's orders.
    pub monetary: f64,
    /// Whole days between the customer's last order and the latest order of
    /// the whole input.
    pub recency: i64,
    /// Position of the customer in ascending id order. A chart label, not a
    /// rank; it travels with the row when the table is re-sorted.
    pub customer_id_number: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfmColumn {
    CustomerIdNumber,
    Recency,
    Frequency,
    Monetary,
}

impl Ranked for RfmRow {
    type Column = RfmColumn;

    fn compare_by(&self, other: &Self, column: RfmColumn) -> Ordering {
        match column {
            RfmColumn::CustomerIdNumber => self.customer_id_number.cmp(&other.customer_id_number),
            RfmColumn::Recency => self.recency.cmp(&other.recency),
            RfmColumn::Frequency => self.frequency.cmp(&other.frequency),
            RfmColumn::Monetary => self.monetary.total_cmp(&other.monetary),
        }
    }
}

struct CustomerAccumulator<'a> {
    orders: HashSet<&'a str>,
    monetary: f64,
    last_order: NaiveDateTime,
}

/// Builds one RFM row per customer, ordered by `customer_unique_id`.
///
/// Recency is measured against the most recent timestamp in `records`, not
/// the wall clock, so a customer whose last order is that timestamp has a
/// recency of zero.
pub fn build_rfm(records: &[OrderRecord]) -> Table<RfmRow> {
    let mut customers: BTreeMap<&str, CustomerAccumulator<'_>> = BTreeMap::new();
    let mut reference: Option<NaiveDateTime> = None;

    for record in records {
        reference = Some(reference.map_or(record.order_date, |r| r.max(record.order_date)));

        let acc = customers
            .entry(record.customer_unique_id.as_str())
            .or_insert_with(|| CustomerAccumulator {
                orders: HashSet::new(),
                monetary: 0.0,
                last_order: record.order_date,
            });
        acc.orders.insert(record.order_id.as_str());
        acc.monetary += record.revenue;
        acc.last_order = acc.last_order.max(record.order_date);
    }

    let Some(reference) = reference else {
        return Table::empty();
    };

    let rows: Vec<RfmRow> = customers
        .into_iter()
        .enumerate()
        .map(|(customer_id_number, (customer, acc))| RfmRow {
            customer_unique_id: customer.to_string(),
            frequency: acc.orders.len() as u64,
            monetary: acc.monetary,
            recency: (reference - acc.last_order).num_days(),
            customer_id_number,
        })
        .collect();

    debug!(
        rows = records.len(),
        customers = rows.len(),
        %reference,
        "built rfm table"
    );
    Table::new(rows)
}

/// The three RFM leaderboards: most recent, most frequent and highest
/// spending customers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmLeaders {
    pub recency: Table<RfmRow>,
    pub frequency: Table<RfmRow>,
    pub monetary: Table<RfmRow>,
}

impl RfmLeaders {
    pub fn from_table(table: &Table<RfmRow>, n: usize) -> Self {
        RfmLeaders {
            recency: table.top_n(n, RfmColumn::Recency, SortOrder::Ascending),
            frequency: table.top_n(n, RfmColumn::Frequency, SortOrder::Descending),
            monetary: table.top_n(n, RfmColumn::Monetary, SortOrder::Descending),
        }
    }
}
