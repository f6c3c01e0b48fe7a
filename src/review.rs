//! Mean review score per product category.
//!
//! Reviews cover the whole history and are never narrowed by the order date
//! range.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::model::ReviewRecord;
use crate::rank::{Ranked, SortOrder, Table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRow {
    pub product_category: String,
    pub mean_score: f64,
    pub review_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewColumn {
    Category,
    MeanScore,
    ReviewCount,
}

impl Ranked for ReviewRow {
    type Column = ReviewColumn;

    fn compare_by(&self, other: &Self, column: ReviewColumn) -> Ordering {
        match column {
            ReviewColumn::Category => self.product_category.cmp(&other.product_category),
            ReviewColumn::MeanScore => self.mean_score.total_cmp(&other.mean_score),
            ReviewColumn::ReviewCount => self.review_count.cmp(&other.review_count),
        }
    }
}

/// Groups reviews by category, rows in ascending category order.
pub fn aggregate_reviews(reviews: &[ReviewRecord]) -> Table<ReviewRow> {
    let mut categories: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for review in reviews {
        let (total, count) = categories
            .entry(review.product_category.as_str())
            .or_insert((0.0, 0));
        *total += review.review_score;
        *count += 1;
    }

    let rows: Vec<ReviewRow> = categories
        .into_iter()
        .map(|(category, (total, count))| ReviewRow {
            product_category: category.to_string(),
            mean_score: total / count as f64,
            review_count: count,
        })
        .collect();

    debug!(
        reviews = reviews.len(),
        categories = rows.len(),
        "aggregated reviews"
    );
    Table::new(rows)
}

/// Best and worst reviewed categories, both sorted from one grouped table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRanking {
    pub best: Table<ReviewRow>,
    pub worst: Table<ReviewRow>,
}

impl ReviewRanking {
    pub fn from_table(table: &Table<ReviewRow>) -> Self {
        ReviewRanking {
            best: table.sorted_by(ReviewColumn::MeanScore, SortOrder::Descending),
            worst: table.sorted_by(ReviewColumn::MeanScore, SortOrder::Ascending),
        }
    }

    /// Keeps the first `n` rows of both orderings.
    pub fn head(&self, n: usize) -> Self {
        ReviewRanking {
            best: self.best.top_n(n, ReviewColumn::MeanScore, SortOrder::Descending),
            worst: self.worst.top_n(n, ReviewColumn::MeanScore, SortOrder::Ascending),
        }
    }

    pub fn best_category(&self) -> Option<&ReviewRow> {
        self.best.first()
    }

    pub fn worst_category(&self) -> Option<&ReviewRow> {
        self.worst.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn review(category: &str, score: f64) -> ReviewRecord {
        ReviewRecord {
            product_category: category.to_string(),
            review_score: score,
            review_date: NaiveDate::from_ymd_opt(2017, 8, 20)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_mean_per_category() {
        let reviews = vec![
            review("toys", 5.0),
            review("auto", 2.0),
            review("toys", 4.0),
            review("auto", 3.0),
            review("auto", 1.0),
        ];
        let table = aggregate_reviews(&reviews);
        let rows: Vec<_> = table
            .iter()
            .map(|r| (r.product_category.as_str(), r.mean_score, r.review_count))
            .collect();
        assert_eq!(rows, vec![("auto", 2.0, 3), ("toys", 4.5, 2)]);
    }

    #[test]
    fn test_ranking_best_and_worst() {
        let reviews = vec![
            review("toys", 5.0),
            review("auto", 2.0),
            review("books", 4.0),
        ];
        let ranking = ReviewRanking::from_table(&aggregate_reviews(&reviews));
        assert_eq!(ranking.best_category().unwrap().product_category, "toys");
        assert_eq!(ranking.worst_category().unwrap().product_category, "auto");
        assert_eq!(ranking.best.len(), 3);
        assert_eq!(ranking.worst.len(), 3);

        let head = ranking.head(2);
        let best: Vec<_> = head.best.iter().map(|r| r.product_category.as_str()).collect();
        assert_eq!(best, vec!["toys", "books"]);
        let worst: Vec<_> = head.worst.iter().map(|r| r.product_category.as_str()).collect();
        assert_eq!(worst, vec!["auto", "books"]);
    }

    #[test]
    fn test_empty_reviews() {
        let ranking = ReviewRanking::from_table(&aggregate_reviews(&[]));
        assert!(ranking.best_category().is_none());
        assert!(ranking.worst_category().is_none());
    }
}
