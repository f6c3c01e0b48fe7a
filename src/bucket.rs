//! Daily and monthly order/revenue series.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::model::OrderRecord;
use crate::rank::{Ranked, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
}

impl Granularity {
    /// Start of the bucket containing `day`.
    pub fn floor(self, day: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => day,
            Granularity::Monthly => day - Days::new(u64::from(day.day0())),
        }
    }

    fn next(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Daily => start.succ_opt(),
            Granularity::Monthly => start.checked_add_months(Months::new(1)),
        }
    }

    /// Axis label for a bucket: `2023-06-14` for days, `2023-06` for months.
    pub fn label(self, start: NaiveDate) -> String {
        match self {
            Granularity::Daily => start.format("%Y-%m-%d").to_string(),
            Granularity::Monthly => start.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => f.write_str("Daily"),
            Granularity::Monthly => f.write_str("Monthly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    pub start: NaiveDate,
    pub label: String,
    pub order_count: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketColumn {
    Start,
    OrderCount,
    Revenue,
}

impl Ranked for TimeBucket {
    type Column = BucketColumn;

    fn compare_by(&self, other: &Self, column: BucketColumn) -> Ordering {
        match column {
            BucketColumn::Start => self.start.cmp(&other.start),
            BucketColumn::OrderCount => self.order_count.cmp(&other.order_count),
            BucketColumn::Revenue => self.revenue.total_cmp(&other.revenue),
        }
    }
}

#[derive(Default)]
struct BucketAccumulator<'a> {
    orders: HashSet<&'a str>,
    revenue: f64,
}

/// Groups `records` into calendar buckets, ascending by bucket start.
///
/// `order_count` counts distinct order ids per bucket while `revenue` sums
/// every line. The series is contiguous: periods between the first and last
/// occupied bucket are emitted with zero orders and zero revenue.
pub fn bucket_by_time(records: &[OrderRecord], granularity: Granularity) -> Table<TimeBucket> {
    let mut occupied: BTreeMap<NaiveDate, BucketAccumulator<'_>> = BTreeMap::new();
    for record in records {
        let acc = occupied
            .entry(granularity.floor(record.order_day()))
            .or_default();
        acc.orders.insert(record.order_id.as_str());
        acc.revenue += record.revenue;
    }

    let (first, last) = match (occupied.keys().next(), occupied.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Table::empty(),
    };

    let mut rows = Vec::new();
    let mut cursor = first;
    loop {
        let (order_count, revenue) = occupied
            .get(&cursor)
            .map(|acc| (acc.orders.len() as u64, acc.revenue))
            .unwrap_or((0, 0.0));
        rows.push(TimeBucket {
            start: cursor,
            label: granularity.label(cursor),
            order_count,
            revenue,
        });
        if cursor >= last {
            break;
        }
        match granularity.next(cursor) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    debug!(
        rows = records.len(),
        occupied = occupied.len(),
        buckets = rows.len(),
        %granularity,
        "bucketed orders"
    );
    Table::new(rows)
}

/// Whole-window totals of a series, shown as headline numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimeSeriesTotals {
    pub order_count: u64,
    pub revenue: f64,
}

impl TimeSeriesTotals {
    pub fn of(series: &Table<TimeBucket>) -> Self {
        series
            .iter()
            .fold(TimeSeriesTotals::default(), |mut totals, bucket| {
                totals.order_count += bucket.order_count;
                totals.revenue += bucket.revenue;
                totals
            })
    }
}
