//! Command-line and environment configuration for `storefront-report`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::bucket::Granularity;
use crate::report::{ReportSettings, DEFAULT_TOP_N};

/// Builds order, revenue, demography, review and RFM tables from CSV
/// exports of an e-commerce store.
#[derive(Debug, Clone, Parser)]
#[command(name = "storefront-report", version, about)]
pub struct ReportConfig {
    /// Order lines CSV.
    #[arg(long, env = "STOREFRONT_ORDERS")]
    pub orders: PathBuf,

    /// Reviews CSV.
    #[arg(long, env = "STOREFRONT_REVIEWS")]
    pub reviews: PathBuf,

    /// Directory receiving the generated tables.
    #[arg(long, env = "STOREFRONT_OUTPUT", default_value = "report")]
    pub output: PathBuf,

    /// First day to include (YYYY-MM-DD). Defaults to the earliest order.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD). Defaults to the latest order.
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = Granularity::Daily)]
    pub timeframe: Granularity,

    /// Rows kept on each best/worst view.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,
}

impl ReportConfig {
    pub fn settings(&self) -> ReportSettings {
        ReportSettings {
            granularity: self.timeframe,
            top_n: self.top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            ReportConfig::try_parse_from(["storefront-report", "--orders", "o.csv", "--reviews", "r.csv"])
                .unwrap();
        assert_eq!(config.output, PathBuf::from("report"));
        assert_eq!(config.timeframe, Granularity::Daily);
        assert_eq!(config.settings().top_n, DEFAULT_TOP_N);
        assert!(config.from.is_none());
    }

    #[test]
    fn test_monthly_range() {
        let config = ReportConfig::try_parse_from([
            "storefront-report",
            "--orders",
            "o.csv",
            "--reviews",
            "r.csv",
            "--from",
            "2017-01-01",
            "--to",
            "2017-06-30",
            "--timeframe",
            "monthly",
            "--top",
            "10",
        ])
        .unwrap();
        assert_eq!(config.timeframe, Granularity::Monthly);
        assert_eq!(config.from, NaiveDate::from_ymd_opt(2017, 1, 1));
        assert_eq!(config.settings().top_n, 10);
    }

    #[test]
    fn test_rejects_bad_date() {
        let result = ReportConfig::try_parse_from([
            "storefront-report",
            "--orders",
            "o.csv",
            "--reviews",
            "r.csv",
            "--from",
            "01/02/2017",
        ]);
        assert!(result.is_err());
    }
}
