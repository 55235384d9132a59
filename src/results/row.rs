use std::sync::Arc;

use crate::types::SqlValue;

/// A single row of a normalized result set.
///
/// Column names are shared across every row of the set; values sit in
/// declaration order, so the row is an ordered sequence of
/// (column-name, value) pairs.
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    columns: Arc<Vec<String>>,
    values: Vec<SqlValue>,
}

impl NormalizedRow {
    /// Create a row over a shared column-name list.
    #[must_use]
    pub fn new(columns: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        NormalizedRow { columns, values }
    }

    /// Column names for this row, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values for this row, in column order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Get a value by column name, or `None` if no such column exists.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        let idx = self.columns.iter().position(|name| name == column)?;
        self.values.get(idx)
    }

    /// Get a value by column index, or `None` if out of bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Iterate the row as (column-name, value) pairs in declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Number of values in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
