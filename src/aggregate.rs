//! Grouping of order lines by one categorical dimension.
//!
//! A single [`aggregate_by`] serves every breakdown of the dashboard; the
//! geography and category tables only differ in the [`Dimension`] they group
//! by and the [`Measure`] they compute.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::model::OrderRecord;
use crate::rank::{Ranked, SortOrder, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CustomerState,
    CustomerCity,
    SellerState,
    SellerCity,
    ProductCategory,
}

impl Dimension {
    pub fn value<'a>(&self, record: &'a OrderRecord) -> &'a str {
        match self {
            Dimension::CustomerState => &record.customer_state,
            Dimension::CustomerCity => &record.customer_city,
            Dimension::SellerState => &record.seller_state,
            Dimension::SellerCity => &record.seller_city,
            Dimension::ProductCategory => &record.product_category,
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            Dimension::CustomerState => "customer_state",
            Dimension::CustomerCity => "customer_city",
            Dimension::SellerState => "seller_state",
            Dimension::SellerCity => "seller_city",
            Dimension::ProductCategory => "product_category",
        }
    }
}

/// Identifier whose distinct values are counted per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountField {
    CustomerUniqueId,
    SellerId,
    OrderId,
}

impl CountField {
    pub fn value<'a>(&self, record: &'a OrderRecord) -> &'a str {
        match self {
            CountField::CustomerUniqueId => &record.customer_unique_id,
            CountField::SellerId => &record.seller_id,
            CountField::OrderId => &record.order_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    DistinctCount(CountField),
    RevenueSum,
}

impl Default for Measure {
    fn default() -> Self {
        Measure::DistinctCount(CountField::OrderId)
    }
}

impl Measure {
    pub fn column_name(&self) -> &'static str {
        match self {
            Measure::DistinctCount(CountField::CustomerUniqueId) => "customer_count",
            Measure::DistinctCount(CountField::SellerId) => "seller_count",
            Measure::DistinctCount(CountField::OrderId) => "order_count",
            Measure::RevenueSum => "revenue",
        }
    }
}

/// Value of a measure for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Quantity {
    Count(u64),
    Sum(f64),
}

impl Quantity {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Quantity::Count(n) => n as f64,
            Quantity::Sum(v) => v,
        }
    }

    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Quantity::Count(a), Quantity::Count(b)) => a.cmp(b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Count(n) => write!(f, "{n}"),
            Quantity::Sum(v) => write!(f, "{v:.2}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: String,
    pub value: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupColumn {
    Key,
    Value,
}

impl Ranked for GroupRow {
    type Column = GroupColumn;

    fn compare_by(&self, other: &Self, column: GroupColumn) -> Ordering {
        match column {
            GroupColumn::Key => self.key.cmp(&other.key),
            GroupColumn::Value => self.value.total_cmp(&other.value),
        }
    }
}

#[derive(Default)]
struct GroupAccumulator<'a> {
    seen: HashSet<&'a str>,
    revenue: f64,
}

impl<'a> GroupAccumulator<'a> {
    fn add(&mut self, record: &'a OrderRecord, measure: Measure) {
        match measure {
            Measure::DistinctCount(field) => {
                self.seen.insert(field.value(record));
            }
            Measure::RevenueSum => self.revenue += record.revenue,
        }
    }

    fn finish(self, measure: Measure) -> Quantity {
        match measure {
            Measure::DistinctCount(_) => Quantity::Count(self.seen.len() as u64),
            Measure::RevenueSum => Quantity::Sum(self.revenue),
        }
    }
}

/// Groups `records` by `dimension` and computes `measure` per group.
///
/// Rows come back sorted by value, largest first. Groups with equal values
/// keep the order in which their key first appeared in `records`.
pub fn aggregate_by(
    records: &[OrderRecord],
    dimension: Dimension,
    measure: Measure,
) -> Table<GroupRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, GroupAccumulator<'_>)> = Vec::new();

    for record in records {
        let key = dimension.value(record);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key, GroupAccumulator::default()));
            groups.len() - 1
        });
        groups[slot].1.add(record, measure);
    }

    let rows: Vec<GroupRow> = groups
        .into_iter()
        .map(|(key, acc)| GroupRow {
            key: key.to_string(),
            value: acc.finish(measure),
        })
        .collect();

    debug!(
        rows = records.len(),
        groups = rows.len(),
        dimension = dimension.column_name(),
        measure = measure.column_name(),
        "aggregated orders"
    );
    Table::new(rows).sorted_by(GroupColumn::Value, SortOrder::Descending)
}

/// The standard demography and category tables of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakdown {
    CustomersByState,
    CustomersByCity,
    SellersByState,
    SellersByCity,
    OrdersByCategory,
    RevenueByCategory,
}

impl Breakdown {
    pub const DEMOGRAPHY: [Breakdown; 4] = [
        Breakdown::SellersByCity,
        Breakdown::SellersByState,
        Breakdown::CustomersByCity,
        Breakdown::CustomersByState,
    ];

    pub fn dimension(self) -> Dimension {
        match self {
            Breakdown::CustomersByState => Dimension::CustomerState,
            Breakdown::CustomersByCity => Dimension::CustomerCity,
            Breakdown::SellersByState => Dimension::SellerState,
            Breakdown::SellersByCity => Dimension::SellerCity,
            Breakdown::OrdersByCategory | Breakdown::RevenueByCategory => {
                Dimension::ProductCategory
            }
        }
    }

    pub fn measure(self) -> Measure {
        match self {
            Breakdown::CustomersByState | Breakdown::CustomersByCity => {
                Measure::DistinctCount(CountField::CustomerUniqueId)
            }
            Breakdown::SellersByState | Breakdown::SellersByCity => {
                Measure::DistinctCount(CountField::SellerId)
            }
            Breakdown::OrdersByCategory => Measure::DistinctCount(CountField::OrderId),
            Breakdown::RevenueByCategory => Measure::RevenueSum,
        }
    }

    /// File stem used when the table is exported.
    pub fn name(self) -> &'static str {
        match self {
            Breakdown::CustomersByState => "customers_by_state",
            Breakdown::CustomersByCity => "customers_by_city",
            Breakdown::SellersByState => "sellers_by_state",
            Breakdown::SellersByCity => "sellers_by_city",
            Breakdown::OrdersByCategory => "orders_by_category",
            Breakdown::RevenueByCategory => "revenue_by_category",
        }
    }

    pub fn table(self, records: &[OrderRecord]) -> Table<GroupRow> {
        aggregate_by(records, self.dimension(), self.measure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order(order_id: &str, customer: &str, state: &str, seller: &str, category: &str) -> OrderRecord {
        OrderRecord {
            order_id: order_id.to_string(),
            order_date: NaiveDate::from_ymd_opt(2018, 5, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            customer_unique_id: customer.to_string(),
            customer_city: format!("{state}-city"),
            customer_state: state.to_string(),
            seller_id: seller.to_string(),
            seller_city: "campinas".to_string(),
            seller_state: "SP".to_string(),
            product_category: category.to_string(),
            revenue: 10.0,
        }
    }

    fn keyed(table: &Table<GroupRow>) -> Vec<(&str, Quantity)> {
        table.iter().map(|r| (r.key.as_str(), r.value)).collect()
    }

    #[test]
    fn test_category_order_counts() {
        let records = vec![
            order("o1", "c1", "SP", "s1", "A"),
            order("o2", "c2", "SP", "s1", "B"),
            order("o3", "c3", "SP", "s1", "A"),
        ];
        let table = aggregate_by(&records, Dimension::ProductCategory, Measure::default());
        assert_eq!(
            keyed(&table),
            vec![("A", Quantity::Count(2)), ("B", Quantity::Count(1))]
        );
    }

    #[test]
    fn test_distinct_count_not_row_count() {
        let records = vec![
            order("o1", "c1", "RJ", "s1", "A"),
            order("o1", "c1", "RJ", "s2", "A"),
            order("o2", "c1", "RJ", "s1", "A"),
            order("o3", "c2", "MG", "s1", "A"),
        ];
        let customers = aggregate_by(
            &records,
            Dimension::CustomerState,
            Measure::DistinctCount(CountField::CustomerUniqueId),
        );
        assert_eq!(
            keyed(&customers),
            vec![("RJ", Quantity::Count(1)), ("MG", Quantity::Count(1))]
        );

        let sellers = Breakdown::SellersByState.table(&records);
        assert_eq!(keyed(&sellers), vec![("SP", Quantity::Count(2))]);
    }

    #[test]
    fn test_ties_follow_first_seen_key() {
        let records = vec![
            order("o1", "c1", "SP", "s1", "zeta"),
            order("o2", "c2", "SP", "s1", "alpha"),
            order("o3", "c3", "SP", "s1", "mid"),
            order("o4", "c4", "SP", "s1", "mid"),
        ];
        let table = Breakdown::OrdersByCategory.table(&records);
        let keys: Vec<_> = table.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["mid", "zeta", "alpha"]);
    }

    #[test]
    fn test_revenue_sum_is_not_deduplicated() {
        let mut records = vec![
            order("o1", "c1", "SP", "s1", "A"),
            order("o1", "c1", "SP", "s1", "A"),
            order("o2", "c2", "SP", "s1", "B"),
        ];
        records[2].revenue = 50.0;
        let table = Breakdown::RevenueByCategory.table(&records);
        assert_eq!(
            keyed(&table),
            vec![("B", Quantity::Sum(50.0)), ("A", Quantity::Sum(20.0))]
        );
    }

    #[test]
    fn test_empty_records() {
        for breakdown in Breakdown::DEMOGRAPHY {
            assert!(breakdown.table(&[]).is_empty());
        }
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(Quantity::Count(3).to_string(), "3");
        assert_eq!(Quantity::Sum(1234.5).to_string(), "1234.50");
    }
}
