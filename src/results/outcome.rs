use crate::client::{RawQueryResult, SimpleQueryResponse};

use super::normalize::normalize;
use super::result_set::ResultSet;

/// Normalized outcome of one SQL statement.
///
/// Row-returning statements carry a [`ResultSet`]; row-less commands carry
/// the affected-row count or just completion. A statement that both reports
/// an affected count and returns rows (e.g. `INSERT .. RETURNING`) keeps
/// both.
#[derive(Debug, Clone)]
pub enum StatementOutcome {
    /// Statement returned rows.
    Rows(ResultSet),
    /// Statement reported an affected count and returned rows.
    AffectedRows { affected: u64, rows: ResultSet },
    /// Row-less command with an affected count.
    Affected(u64),
    /// Completed without rows or a count (e.g. `SET`, `BEGIN`).
    Done,
}

impl StatementOutcome {
    pub(crate) fn from_raw(raw: RawQueryResult) -> Self {
        match raw {
            RawQueryResult::Done => StatementOutcome::Done,
            RawQueryResult::Affected(n) => StatementOutcome::Affected(n),
            RawQueryResult::Rows { columns, rows } => {
                StatementOutcome::Rows(normalize(&columns, rows))
            }
            RawQueryResult::AffectedRows {
                affected,
                columns,
                rows,
            } => StatementOutcome::AffectedRows {
                affected,
                rows: normalize(&columns, rows),
            },
        }
    }

    /// Normalized rows, if the statement produced any.
    #[must_use]
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            StatementOutcome::Rows(rows)
            | StatementOutcome::AffectedRows { rows, .. } => Some(rows),
            _ => None,
        }
    }

    /// Affected-row count, if the statement reported one.
    #[must_use]
    pub fn affected(&self) -> Option<u64> {
        match self {
            StatementOutcome::Affected(n)
            | StatementOutcome::AffectedRows { affected: n, .. } => Some(*n),
            _ => None,
        }
    }
}

/// Reply to a simple query: one outcome for single-statement text, a list
/// when the text contained several statements. The shapes stay distinct so
/// callers never have to guess whether a one-element list meant one
/// statement or a batch that happened to have one.
#[derive(Debug, Clone)]
pub enum QueryReply {
    Single(StatementOutcome),
    Batch(Vec<StatementOutcome>),
}

impl QueryReply {
    pub(crate) fn from_response(response: SimpleQueryResponse) -> Self {
        match response {
            SimpleQueryResponse::Single(raw) => {
                QueryReply::Single(StatementOutcome::from_raw(raw))
            }
            SimpleQueryResponse::Multi(raws) => QueryReply::Batch(
                raws.into_iter().map(StatementOutcome::from_raw).collect(),
            ),
        }
    }

    /// The sole outcome of a single-statement reply.
    #[must_use]
    pub fn into_single(self) -> Option<StatementOutcome> {
        match self {
            QueryReply::Single(outcome) => Some(outcome),
            QueryReply::Batch(_) => None,
        }
    }

    /// Outcomes in statement order, regardless of shape.
    #[must_use]
    pub fn into_outcomes(self) -> Vec<StatementOutcome> {
        match self {
            QueryReply::Single(outcome) => vec![outcome],
            QueryReply::Batch(outcomes) => outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ColumnInfo;
    use crate::types::SqlValue;

    fn raw_rows() -> RawQueryResult {
        RawQueryResult::Rows {
            columns: vec![ColumnInfo::new("id", "int8")],
            rows: vec![vec![SqlValue::Int(7)]],
        }
    }

    #[test]
    fn raw_variants_map_one_to_one() {
        assert!(matches!(
            StatementOutcome::from_raw(RawQueryResult::Done),
            StatementOutcome::Done
        ));
        assert!(matches!(
            StatementOutcome::from_raw(RawQueryResult::Affected(3)),
            StatementOutcome::Affected(3)
        ));

        let outcome = StatementOutcome::from_raw(raw_rows());
        let rows = outcome.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows[0].get("id").unwrap().as_int(), Some(7));
    }

    #[test]
    fn affected_rows_keeps_both_count_and_rows() {
        let outcome = StatementOutcome::from_raw(RawQueryResult::AffectedRows {
            affected: 2,
            columns: vec![ColumnInfo::new("id", "int8")],
            rows: vec![vec![SqlValue::Int(1)], vec![SqlValue::Int(2)]],
        });
        assert_eq!(outcome.affected(), Some(2));
        assert_eq!(outcome.rows().unwrap().len(), 2);
    }

    #[test]
    fn single_and_batch_replies_stay_distinct() {
        let single = QueryReply::from_response(SimpleQueryResponse::Single(
            RawQueryResult::Affected(1),
        ));
        let outcome = single
            .into_single()
            .expect("a single reply yields its sole outcome");
        assert_eq!(outcome.affected(), Some(1));

        let batch = QueryReply::from_response(SimpleQueryResponse::Multi(vec![
            RawQueryResult::Affected(1),
        ]));
        let QueryReply::Batch(outcomes) = &batch else {
            panic!("one-statement batch must stay a batch");
        };
        assert_eq!(outcomes.len(), 1);
        assert!(
            batch.into_single().is_none(),
            "a one-statement batch never collapses to a single outcome"
        );
    }

    #[test]
    fn batch_preserves_statement_order() {
        let reply = QueryReply::from_response(SimpleQueryResponse::Multi(vec![
            RawQueryResult::Done,
            raw_rows(),
            RawQueryResult::Affected(5),
        ]));
        let outcomes = reply.into_outcomes();
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], StatementOutcome::Done));
        assert!(outcomes[1].rows().is_some());
        assert_eq!(outcomes[2].affected(), Some(5));
    }
}
