use std::sync::Arc;

use crate::types::SqlValue;

use super::row::NormalizedRow;

/// Normalized rows from one statement's execution.
///
/// Column names are stored once and shared by every row. An empty set (no
/// columns, no rows) is the normal result of statements that produce no
/// addressable data.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The normalized rows, in result order.
    pub rows: Vec<NormalizedRow>,
    /// Column names shared by all rows; unset until the first
    /// columns-carrying statement sets them.
    columns: Option<Arc<Vec<String>>>,
}

impl ResultSet {
    /// Create an empty result set with preallocated row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            columns: None,
        }
    }

    /// Set the column names shared by all rows of this set.
    pub fn set_columns(&mut self, columns: Arc<Vec<String>>) {
        self.columns = Some(columns);
    }

    /// Column names of this set, if any statement set them.
    #[must_use]
    pub fn columns(&self) -> Option<&Arc<Vec<String>>> {
        self.columns.as_ref()
    }

    /// Append one row of positional values.
    ///
    /// Rows arriving before column names are set carry no addressable data
    /// and are dropped.
    pub fn push_row_values(&mut self, values: Vec<SqlValue>) {
        if let Some(columns) = &self.columns {
            self.rows
                .push(NormalizedRow::new(Arc::clone(columns), values));
        }
    }

    /// Number of rows in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the normalized rows in result order.
    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a NormalizedRow;
    type IntoIter = std::slice::Iter<'a, NormalizedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
