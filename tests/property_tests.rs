//! Property-based tests using proptest.
//!
//! Invariants covered:
//! - daily order counts add up to the distinct order count of the input
//! - breakdowns are sorted descending and their counts ignore input order
//! - RFM ordinals are dense, follow ascending ids and ride along re-sorts
//! - a customer whose last order is the newest timestamp has recency 0
//! - top_n never returns more rows than asked for or than exist

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use storefront_analytics::{
    aggregate_by, bucket_by_time, build_rfm, top_n, CountField, Dimension, Granularity,
    GroupColumn, Measure, OrderRecord, RfmColumn, SortOrder,
};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2017, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Strategy: orders drawn from small id pools so keys repeat. Each order id
/// owns a single timestamp, as in real exports.
fn arb_orders() -> impl Strategy<Value = Vec<OrderRecord>> {
    prop::collection::vec(
        (0u32..12, 0u32..6, 0u32..4, 0u32..5, 0i64..400 * 24 * 60, 0u32..10_000),
        0..60,
    )
    .prop_map(|lines| {
        let mut order_times: HashMap<u32, NaiveDateTime> = HashMap::new();
        lines
            .into_iter()
            .map(|(order, customer, seller, category, minutes, cents)| {
                let when = *order_times
                    .entry(order)
                    .or_insert_with(|| base() + Duration::minutes(minutes));
                OrderRecord {
                    order_id: format!("o{order}"),
                    order_date: when,
                    customer_unique_id: format!("c{customer}"),
                    customer_city: format!("city{}", customer % 3),
                    customer_state: format!("S{}", customer % 2),
                    seller_id: format!("s{seller}"),
                    seller_city: format!("scity{}", seller % 2),
                    seller_state: format!("SS{}", seller % 3),
                    product_category: format!("cat{category}"),
                    revenue: f64::from(cents) / 100.0,
                }
            })
            .collect()
    })
}

fn arb_dimension() -> impl Strategy<Value = Dimension> {
    prop_oneof![
        Just(Dimension::CustomerState),
        Just(Dimension::CustomerCity),
        Just(Dimension::SellerState),
        Just(Dimension::SellerCity),
        Just(Dimension::ProductCategory),
    ]
}

fn arb_count_field() -> impl Strategy<Value = CountField> {
    prop_oneof![
        Just(CountField::CustomerUniqueId),
        Just(CountField::SellerId),
        Just(CountField::OrderId),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_daily_counts_sum_to_distinct_orders(orders in arb_orders()) {
        let series = bucket_by_time(&orders, Granularity::Daily);
        let total: u64 = series.iter().map(|b| b.order_count).sum();
        let distinct: HashSet<_> = orders.iter().map(|o| o.order_id.as_str()).collect();
        prop_assert_eq!(total, distinct.len() as u64);
    }

    #[test]
    fn prop_series_ascending_and_revenue_preserved(orders in arb_orders(), monthly in any::<bool>()) {
        let granularity = if monthly { Granularity::Monthly } else { Granularity::Daily };
        let series = bucket_by_time(&orders, granularity);
        prop_assert!(series.rows().windows(2).all(|w| w[0].start < w[1].start));

        let bucketed: f64 = series.iter().map(|b| b.revenue).sum();
        let raw: f64 = orders.iter().map(|o| o.revenue).sum();
        prop_assert!((bucketed - raw).abs() < 1e-6);
    }

    #[test]
    fn prop_breakdown_sorted_and_order_independent(
        orders in arb_orders(),
        dimension in arb_dimension(),
        field in arb_count_field(),
    ) {
        let measure = Measure::DistinctCount(field);
        let table = aggregate_by(&orders, dimension, measure);
        prop_assert!(table
            .rows()
            .windows(2)
            .all(|w| w[0].value.as_f64() >= w[1].value.as_f64()));

        let mut reversed = orders.clone();
        reversed.reverse();
        let again = aggregate_by(&reversed, dimension, measure);

        let counts = |t: &storefront_analytics::Table<storefront_analytics::GroupRow>| {
            t.iter()
                .map(|r| (r.key.clone(), r.value.as_f64() as u64))
                .collect::<HashMap<_, _>>()
        };
        prop_assert_eq!(counts(&table), counts(&again));
    }

    #[test]
    fn prop_rfm_ordinals_dense_and_stable(orders in arb_orders()) {
        let rfm = build_rfm(&orders);
        let ids: Vec<_> = rfm.iter().map(|r| r.customer_unique_id.clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(&ids, &sorted);
        prop_assert!(rfm.iter().enumerate().all(|(i, r)| r.customer_id_number == i));

        let by_id: HashMap<_, _> = rfm
            .iter()
            .map(|r| (r.customer_unique_id.clone(), r.customer_id_number))
            .collect();
        for column in [RfmColumn::Recency, RfmColumn::Frequency, RfmColumn::Monetary] {
            let resorted = rfm.sorted_by(column, SortOrder::Descending);
            prop_assert_eq!(resorted.len(), rfm.len());
            for row in &resorted {
                prop_assert_eq!(by_id[&row.customer_unique_id], row.customer_id_number);
            }
        }
    }

    #[test]
    fn prop_rfm_latest_customer_has_zero_recency(orders in arb_orders()) {
        let rfm = build_rfm(&orders);
        if let Some(latest) = orders.iter().map(|o| o.order_date).max() {
            let at_latest: HashSet<_> = orders
                .iter()
                .filter(|o| o.order_date == latest)
                .map(|o| o.customer_unique_id.as_str())
                .collect();
            for row in &rfm {
                prop_assert!(row.recency >= 0);
                prop_assert!(row.frequency >= 1);
                if at_latest.contains(row.customer_unique_id.as_str()) {
                    prop_assert_eq!(row.recency, 0);
                }
            }
        } else {
            prop_assert!(rfm.is_empty());
        }
    }

    #[test]
    fn prop_top_n_bounded(orders in arb_orders(), n in 0usize..10) {
        let table = aggregate_by(&orders, Dimension::ProductCategory, Measure::RevenueSum);
        let top = top_n(&table, n, GroupColumn::Value, SortOrder::Descending);
        prop_assert_eq!(top.len(), n.min(table.len()));
        prop_assert_eq!(top.rows(), &table.rows()[..top.len()]);
    }
}
