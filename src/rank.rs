//! Derived tables and best/worst selection over them.
//!
//! Every aggregator returns a [`Table`]. Ranking never mutates the source
//! table: [`top_n`] and [`bottom_n`] build a fresh, stably sorted copy, so
//! rows that tie on the sort column keep the order they had in the source.

use std::cmp::Ordering;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// A row type that can be ordered by one of its columns.
pub trait Ranked {
    type Column: Copy;

    fn compare_by(&self, other: &Self, column: Self::Column) -> Ordering;
}

/// Ordered, immutable sequence of derived rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Table { rows }
    }

    pub fn empty() -> Self {
        Table { rows: Vec::new() }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The leading row, if any. Callers must treat `None` as "no data".
    pub fn first(&self) -> Option<&R> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

impl<R: Ranked + Clone> Table<R> {
    /// A copy of the table stably sorted by `column`.
    pub fn sorted_by(&self, column: R::Column, order: SortOrder) -> Table<R> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| order.apply(a.compare_by(b, column)));
        Table { rows }
    }

    pub fn top_n(&self, n: usize, column: R::Column, order: SortOrder) -> Table<R> {
        top_n(self, n, column, order)
    }

    pub fn bottom_n(&self, n: usize, column: R::Column) -> Table<R> {
        bottom_n(self, n, column)
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// First `n` rows of `table` under `column` in the given direction.
///
/// Returns every row when the table is shorter than `n`, and an empty table
/// when the source is empty or `n == 0`.
pub fn top_n<R: Ranked + Clone>(
    table: &Table<R>,
    n: usize,
    column: R::Column,
    order: SortOrder,
) -> Table<R> {
    if n == 0 || table.is_empty() {
        return Table::empty();
    }
    let mut sorted = table.sorted_by(column, order);
    sorted.rows.truncate(n);
    sorted
}

/// Lowest `n` rows of `table` under `column`.
pub fn bottom_n<R: Ranked + Clone>(table: &Table<R>, n: usize, column: R::Column) -> Table<R> {
    top_n(table, n, column, SortOrder::Ascending)
}
