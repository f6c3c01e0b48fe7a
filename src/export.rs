//! Writes dashboard tables as CSV files plus a JSON headline summary.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::aggregate::{Breakdown, GroupRow};
use crate::bucket::TimeBucket;
use crate::error::{AnalyticsError, Result};
use crate::rank::Table;
use crate::report::Dashboard;
use crate::review::ReviewRow;
use crate::rfm::RfmRow;

/// Row types written through serde. `HEADER` lists the serialized field
/// names so an empty table still gets its header line.
trait CsvRow: Serialize {
    const HEADER: &'static [&'static str];
}

impl CsvRow for TimeBucket {
    const HEADER: &'static [&'static str] = &["start", "label", "order_count", "revenue"];
}

impl CsvRow for ReviewRow {
    const HEADER: &'static [&'static str] = &["product_category", "mean_score", "review_count"];
}

impl CsvRow for RfmRow {
    const HEADER: &'static [&'static str] = &[
        "customer_unique_id",
        "frequency",
        "monetary",
        "recency",
        "customer_id_number",
    ];
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| AnalyticsError::io(path, e))
}

fn csv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(create(path)?))
}

fn write_rows<R: CsvRow>(path: &Path, table: &Table<R>) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer.write_record(R::HEADER)?;
    for row in table {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| AnalyticsError::io(path, e))
}

fn write_breakdown(path: &Path, breakdown: Breakdown, table: &Table<GroupRow>) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer.write_record([
        breakdown.dimension().column_name(),
        breakdown.measure().column_name(),
    ])?;
    for row in table {
        writer.write_record([row.key.as_str(), row.value.to_string().as_str()])?;
    }
    writer.flush().map_err(|e| AnalyticsError::io(path, e))
}

/// Writes every table of `dashboard` into `dir`, creating it if needed, and
/// returns the written paths in write order.
///
/// Each breakdown gets its full table plus `<name>_most.csv` and
/// `<name>_least.csv` holding the `top_n` leading and trailing rows.
pub fn write_dashboard(dashboard: &Dashboard, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| AnalyticsError::io(dir, e))?;
    let mut written = Vec::new();

    let path = dir.join("timeseries.csv");
    write_rows(&path, &dashboard.series)?;
    written.push(path);

    let breakdowns = [&dashboard.orders_by_category, &dashboard.revenue_by_category]
        .into_iter()
        .chain(dashboard.demography.iter());
    for ranked in breakdowns {
        let name = ranked.breakdown.name();
        let views = [
            ("", &ranked.all),
            ("_most", &ranked.most),
            ("_least", &ranked.least),
        ];
        for (suffix, table) in views {
            let path = dir.join(format!("{name}{suffix}.csv"));
            write_breakdown(&path, ranked.breakdown, table)?;
            written.push(path);
        }
    }

    let reviews = [
        ("reviews.csv", &dashboard.review_ranking.best),
        ("reviews_best.csv", &dashboard.review_leaders.best),
        ("reviews_worst.csv", &dashboard.review_leaders.worst),
    ];
    for (file, table) in reviews {
        let path = dir.join(file);
        write_rows(&path, table)?;
        written.push(path);
    }

    let leaders = &dashboard.rfm_leaders;
    let rfm = [
        ("rfm.csv", &dashboard.rfm),
        ("rfm_top_recency.csv", &leaders.recency),
        ("rfm_top_frequency.csv", &leaders.frequency),
        ("rfm_top_monetary.csv", &leaders.monetary),
    ];
    for (file, table) in rfm {
        let path = dir.join(file);
        write_rows(&path, table)?;
        written.push(path);
    }

    let path = dir.join("summary.json");
    let mut out = create(&path)?;
    serde_json::to_writer_pretty(&mut out, &dashboard.headline())?;
    out.flush().map_err(|e| AnalyticsError::io(&path, e))?;
    written.push(path);

    debug!(files = written.len(), dir = %dir.display(), "dashboard exported");
    Ok(written)
}
