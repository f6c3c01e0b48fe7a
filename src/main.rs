use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use storefront_analytics::config::ReportConfig;
use storefront_analytics::export::write_dashboard;
use storefront_analytics::ingest::{load_orders, load_reviews};
use storefront_analytics::{Dashboard, DateRange};

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let config = ReportConfig::parse();

    let orders = load_orders(&config.orders)
        .with_context(|| format!("loading orders from {}", config.orders.display()))?;
    let reviews = load_reviews(&config.reviews)
        .with_context(|| format!("loading reviews from {}", config.reviews.display()))?;
    info!(orders = orders.len(), reviews = reviews.len(), "inputs loaded");

    let filtered = match DateRange::covering(&orders) {
        Some(full) => {
            let range = full
                .narrowed(config.from, config.to)
                .context("applying --from/--to")?;
            info!(start = %range.start(), end = %range.end(), "date range");
            range.apply(&orders)
        }
        None => Vec::new(),
    };

    let dashboard = Dashboard::build(&filtered, &reviews, &config.settings());
    if dashboard.is_empty() {
        warn!("no orders in the selected range");
    }

    let written = write_dashboard(&dashboard, &config.output)
        .with_context(|| format!("writing report to {}", config.output.display()))?;

    let headline = dashboard.headline();
    info!(
        total_orders = headline.total_orders,
        total_revenue = headline.total_revenue,
        customers = dashboard.rfm.len(),
        files = written.len(),
        output = %config.output.display(),
        "report completed"
    );

    Ok(())
}
