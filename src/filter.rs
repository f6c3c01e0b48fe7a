//! Date-range selection of order records.
//!
//! Filtering happens before the engine is called; none of the aggregators
//! look at the range themselves.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AnalyticsError, Result};
use crate::model::OrderRecord;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AnalyticsError::InvalidDateRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Smallest range containing every order, `None` for no orders.
    pub fn covering(records: &[OrderRecord]) -> Option<Self> {
        let mut days = records.iter().map(OrderRecord::order_day);
        let first = days.next()?;
        let (start, end) = days.fold((first, first), |(lo, hi), day| (lo.min(day), hi.max(day)));
        Some(DateRange { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Narrows this range with optional caller bounds.
    pub fn narrowed(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        DateRange::new(from.unwrap_or(self.start), to.unwrap_or(self.end))
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Orders placed on any day of the range, whole end day included.
    pub fn apply(&self, records: &[OrderRecord]) -> Vec<OrderRecord> {
        records
            .iter()
            .filter(|record| self.contains(record.order_day()))
            .cloned()
            .collect()
    }
}
