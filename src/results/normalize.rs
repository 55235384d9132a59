use std::sync::Arc;

use crate::client::ColumnInfo;
use crate::types::SqlValue;

use super::result_set::ResultSet;

/// Convert a (column-descriptor, row-tuple) pair into a [`ResultSet`] of
/// ordered (column-name, value) rows.
///
/// Zero columns or zero rows normalize to an empty set, never an error;
/// rows without columns carry no addressable data and are dropped. Each row
/// is zipped against the declared column names positionally — equal lengths
/// are part of the upstream client contract and are not checked here. Values
/// pass through untouched: no coercion, no null handling.
#[must_use]
pub fn normalize(columns: &[ColumnInfo], rows: Vec<Vec<SqlValue>>) -> ResultSet {
    if columns.is_empty() || rows.is_empty() {
        return ResultSet::default();
    }

    let names: Arc<Vec<String>> =
        Arc::new(columns.iter().map(|col| col.name.clone()).collect());

    let mut set = ResultSet::with_capacity(rows.len());
    set.set_columns(names);
    for values in rows {
        set.push_row_values(values);
    }
    set
}
