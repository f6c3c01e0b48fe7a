//! Aggregation engine for e-commerce reporting.
//!
//! Turns already-parsed order and review records into the derived tables a
//! sales dashboard draws from:
//!
//! - [`bucket_by_time`]: daily or monthly order count and revenue series
//! - [`aggregate_by`]: distinct-count or revenue breakdowns over one
//!   dimension (customer/seller geography, product category)
//! - [`build_rfm`]: per-customer recency, frequency and monetary metrics
//! - [`aggregate_reviews`]: mean review score per category
//! - [`top_n`] / [`bottom_n`]: best/worst selection over any of the above
//!
//! Every engine function is a pure transform of its input. Empty input gives
//! an empty [`Table`], never an error. Reading CSV files ([`ingest`]),
//! narrowing by date ([`DateRange`]) and exporting results ([`export`]) sit
//! around the engine for the `storefront-report` binary.

pub mod aggregate;
pub mod bucket;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod rank;
pub mod report;
pub mod review;
pub mod rfm;

pub use aggregate::{
    aggregate_by, Breakdown, CountField, Dimension, GroupColumn, GroupRow, Measure, Quantity,
};
pub use bucket::{bucket_by_time, BucketColumn, Granularity, TimeBucket, TimeSeriesTotals};
pub use error::{AnalyticsError, Result};
pub use filter::DateRange;
pub use model::{OrderRecord, ReviewRecord, UNKNOWN_CATEGORY};
pub use rank::{bottom_n, top_n, Ranked, SortOrder, Table};
pub use report::{Dashboard, Headline, ReportSettings};
pub use review::{aggregate_reviews, ReviewColumn, ReviewRanking, ReviewRow};
pub use rfm::{build_rfm, RfmColumn, RfmLeaders, RfmRow};
