use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tokio_postgres::{Row, SimpleQueryMessage, Statement};

use crate::client::{ColumnInfo, RawQueryResult, SimpleQueryResponse};
use crate::error::SessionError;
use crate::types::SqlValue;

// Simple-protocol values always arrive in text format.
const SIMPLE_TEXT: &str = "text";

/// Column metadata as reported by a prepared statement.
pub(super) fn column_infos(stmt: &Statement) -> Vec<ColumnInfo> {
    stmt.columns()
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_().name()))
        .collect()
}

/// Extracts a [`SqlValue`] from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns [`SessionError`] if the column cannot be retrieved.
pub(super) fn extract_value(row: &Row, idx: usize) -> Result<SqlValue, SessionError> {
    // Dispatch on the catalog name of the column type; anything not listed
    // is fetched as text.
    match row.columns()[idx].type_().name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Int))
        }
        "float4" => {
            let val: Option<f32> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, |v| SqlValue::Float(f64::from(v))))
        }
        "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Bool))
        }
        "timestamp" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Timestamp))
        }
        "timestamptz" => {
            let val: Option<DateTime<Utc>> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, |v| SqlValue::Timestamp(v.naive_utc())))
        }
        "json" | "jsonb" => {
            let val: Option<Value> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Json))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Bytes))
        }
        _ => {
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Text))
        }
    }
}

/// Positional value tuples for a slice of rows, in row order.
///
/// # Errors
/// Returns [`SessionError`] if any value cannot be extracted.
pub(super) fn positional_rows(rows: &[Row]) -> Result<Vec<Vec<SqlValue>>, SessionError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let col_count = row.columns().len();
        let mut values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            values.push(extract_value(row, idx)?);
        }
        out.push(values);
    }
    Ok(out)
}

/// Fold the message stream of a simple-protocol exchange into per-statement
/// results.
///
/// Each `CommandComplete` closes one statement: with a row description in
/// play it becomes `Rows` (the completion count of a row-returning
/// statement duplicates the row count), without one it becomes `Affected`.
/// No `CommandComplete` at all (an empty query string) folds to `Done`.
///
/// # Errors
/// Returns [`SessionError`] if a row value cannot be read.
pub(super) fn fold_simple_messages(
    messages: Vec<SimpleQueryMessage>,
) -> Result<SimpleQueryResponse, SessionError> {
    let mut results: Vec<RawQueryResult> = Vec::new();
    let mut columns: Option<Vec<ColumnInfo>> = None;
    let mut rows: Vec<Vec<SqlValue>> = Vec::new();

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(description) => {
                columns = Some(
                    description
                        .iter()
                        .map(|col| ColumnInfo::new(col.name(), SIMPLE_TEXT))
                        .collect(),
                );
                rows.clear();
            }
            SimpleQueryMessage::Row(row) => {
                if columns.is_none() {
                    columns = Some(
                        row.columns()
                            .iter()
                            .map(|col| ColumnInfo::new(col.name(), SIMPLE_TEXT))
                            .collect(),
                    );
                }
                let mut values = Vec::with_capacity(row.len());
                for idx in 0..row.len() {
                    values.push(match row.try_get(idx)? {
                        Some(text) => SqlValue::Text(text.to_owned()),
                        None => SqlValue::Null,
                    });
                }
                rows.push(values);
            }
            SimpleQueryMessage::CommandComplete(count) => {
                results.push(match columns.take() {
                    Some(cols) => RawQueryResult::Rows {
                        columns: cols,
                        rows: std::mem::take(&mut rows),
                    },
                    None => RawQueryResult::Affected(count),
                });
            }
            // SimpleQueryMessage is non_exhaustive.
            _ => {}
        }
    }

    Ok(if results.len() == 1 {
        SimpleQueryResponse::Single(results.remove(0))
    } else if results.is_empty() {
        SimpleQueryResponse::Single(RawQueryResult::Done)
    } else {
        SimpleQueryResponse::Multi(results)
    })
}
