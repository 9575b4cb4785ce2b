//! Result set accumulation for one statement submission.

use crate::query::protocol::Row;

/// The accumulated, ordered rows of a single statement submission.
///
/// Rows are appended in the order fetched across all pages; no row is
/// dropped or reordered. A `ResultSet` is only handed to the caller once
/// a page without a continuation link has been observed, so it is always
/// complete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
}

impl ResultSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page of rows, preserving fetch order.
    pub(crate) fn append_page(&mut self, rows: Vec<Row>) {
        self.rows.extend(rows);
    }

    /// All rows in fetch order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of accumulated rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result set holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume the result set, yielding the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl From<Vec<Row>> for ResultSet {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
