//! Assembly of every derived table behind the reporting surface.
//!
//! [`Dashboard::build`] is a convenience for callers that want the full set
//! of tables at once. It runs each aggregator on its own input and keeps the
//! results as plain values; deciding how to show an empty table is left to
//! the presentation layer.

use serde::Serialize;
use tracing::info;

use crate::aggregate::{Breakdown, GroupColumn, GroupRow, Quantity};
use crate::bucket::{bucket_by_time, Granularity, TimeBucket, TimeSeriesTotals};
use crate::model::{OrderRecord, ReviewRecord};
use crate::rank::{SortOrder, Table};
use crate::review::{aggregate_reviews, ReviewRanking, ReviewRow};
use crate::rfm::{build_rfm, RfmLeaders, RfmRow};

/// Rows shown on each best/worst chart.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    pub granularity: Granularity,
    pub top_n: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            granularity: Granularity::Daily,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// A full breakdown table with its leading and trailing rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBreakdown {
    #[serde(skip)]
    pub breakdown: Breakdown,
    pub all: Table<GroupRow>,
    pub most: Table<GroupRow>,
    pub least: Table<GroupRow>,
}

impl RankedBreakdown {
    pub fn build(breakdown: Breakdown, orders: &[OrderRecord], n: usize) -> Self {
        let all = breakdown.table(orders);
        RankedBreakdown {
            breakdown,
            most: all.top_n(n, GroupColumn::Value, SortOrder::Descending),
            least: all.bottom_n(n, GroupColumn::Value),
            all,
        }
    }

    pub fn leader(&self) -> Option<&GroupRow> {
        self.all.first()
    }
}

/// A category label with the value that put it first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight<T> {
    pub category: String,
    pub value: T,
}

/// Headline numbers. Every category highlight is `None` when its table has
/// no rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub total_orders: u64,
    pub total_revenue: f64,
    pub most_ordered_category: Option<Highlight<Quantity>>,
    pub highest_revenue_category: Option<Highlight<Quantity>>,
    pub best_reviewed_category: Option<Highlight<f64>>,
    pub worst_reviewed_category: Option<Highlight<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub granularity: Granularity,
    pub series: Table<TimeBucket>,
    pub totals: TimeSeriesTotals,
    pub orders_by_category: RankedBreakdown,
    pub revenue_by_category: RankedBreakdown,
    pub demography: Vec<RankedBreakdown>,
    pub reviews: Table<ReviewRow>,
    pub review_ranking: ReviewRanking,
    /// First `top_n` rows of `review_ranking`.
    pub review_leaders: ReviewRanking,
    pub rfm: Table<RfmRow>,
    pub rfm_leaders: RfmLeaders,
}

impl Dashboard {
    /// Builds every table. `orders` must already be narrowed to the date
    /// range being viewed; `reviews` is the complete review history.
    pub fn build(
        orders: &[OrderRecord],
        reviews: &[ReviewRecord],
        settings: &ReportSettings,
    ) -> Self {
        let n = settings.top_n;
        let series = bucket_by_time(orders, settings.granularity);
        let totals = TimeSeriesTotals::of(&series);

        let reviews = aggregate_reviews(reviews);
        let review_ranking = ReviewRanking::from_table(&reviews);
        let review_leaders = review_ranking.head(n);
        let rfm = build_rfm(orders);
        let rfm_leaders = RfmLeaders::from_table(&rfm, n);

        let dashboard = Dashboard {
            granularity: settings.granularity,
            series,
            totals,
            orders_by_category: RankedBreakdown::build(Breakdown::OrdersByCategory, orders, n),
            revenue_by_category: RankedBreakdown::build(Breakdown::RevenueByCategory, orders, n),
            demography: Breakdown::DEMOGRAPHY
                .iter()
                .map(|&breakdown| RankedBreakdown::build(breakdown, orders, n))
                .collect(),
            reviews,
            review_ranking,
            review_leaders,
            rfm,
            rfm_leaders,
        };

        info!(
            orders = orders.len(),
            buckets = dashboard.series.len(),
            customers = dashboard.rfm.len(),
            categories = dashboard.orders_by_category.all.len(),
            "dashboard built"
        );
        dashboard
    }

    /// True when the order window holds no data. Reviews are not considered.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn headline(&self) -> Headline {
        fn group(row: Option<&GroupRow>) -> Option<Highlight<Quantity>> {
            row.map(|r| Highlight {
                category: r.key.clone(),
                value: r.value,
            })
        }
        fn review(row: Option<&ReviewRow>) -> Option<Highlight<f64>> {
            row.map(|r| Highlight {
                category: r.product_category.clone(),
                value: r.mean_score,
            })
        }

        Headline {
            total_orders: self.totals.order_count,
            total_revenue: self.totals.revenue,
            most_ordered_category: group(self.orders_by_category.leader()),
            highest_revenue_category: group(self.revenue_by_category.leader()),
            best_reviewed_category: review(self.review_ranking.best_category()),
            worst_reviewed_category: review(self.review_ranking.worst_category()),
        }
    }
}
