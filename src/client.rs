use async_trait::async_trait;

use crate::error::SessionError;
use crate::types::{CloseKind, SqlType, SqlValue};

/// Name and type metadata for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name as declared by the statement.
    pub name: String,
    /// Wire-catalog name of the column type.
    pub type_name: String,
}

impl ColumnInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        ColumnInfo {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// One statement's raw result as produced by the underlying client, before
/// any normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawQueryResult {
    /// Completed without producing rows or a row count (e.g. an empty query
    /// string).
    Done,
    /// Row count only (DML without a RETURNING clause, DDL).
    Affected(u64),
    /// Result columns plus positional row tuples.
    Rows {
        columns: Vec<ColumnInfo>,
        rows: Vec<Vec<SqlValue>>,
    },
    /// Row count plus result rows (DML with a RETURNING clause).
    AffectedRows {
        affected: u64,
        columns: Vec<ColumnInfo>,
        rows: Vec<Vec<SqlValue>>,
    },
}

/// Result of a simple-protocol exchange.
///
/// One query string may hold several statements; the client reports whether
/// it produced one result or a list, and the distinction drives how the
/// session tags its reply.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleQueryResponse {
    Single(RawQueryResult),
    Multi(Vec<RawQueryResult>),
}

/// Descriptor for a statement prepared on the session's connection.
///
/// Returned by `prepare` and consumed by `bind`, `execute`, and
/// `close_statement`. Carries the result-column metadata; portal execution
/// results do not repeat it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    /// Caller-chosen statement name.
    pub name: String,
    /// Parameter types the statement was prepared with.
    pub param_types: Vec<SqlType>,
    /// Columns the statement produces.
    pub columns: Vec<ColumnInfo>,
}

impl PreparedStatement {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        param_types: Vec<SqlType>,
        columns: Vec<ColumnInfo>,
    ) -> Self {
        PreparedStatement {
            name: name.into(),
            param_types,
            columns,
        }
    }
}

/// Raw outcome of executing a bound portal.
///
/// Rows are positional tuples without column descriptors (those live on the
/// [`PreparedStatement`]), which is why portal results are returned to
/// callers as-is instead of being normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecuteOutcome {
    /// The portal ran to completion.
    Complete(Vec<Vec<SqlValue>>),
    /// The row cap was reached and the portal has more rows pending.
    Suspended(Vec<Vec<SqlValue>>),
    /// The portal's statement reported a row count instead of rows.
    Affected(u64),
}

/// One entry of a batch execution: a previously bound portal plus its row
/// cap (`0` = unlimited).
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteSpec {
    pub statement: PreparedStatement,
    pub portal: String,
    pub max_rows: u32,
}

impl ExecuteSpec {
    #[must_use]
    pub fn new(statement: PreparedStatement, portal: impl Into<String>, max_rows: u32) -> Self {
        ExecuteSpec {
            statement,
            portal: portal.into(),
            max_rows,
        }
    }
}

/// The protocol primitives a session serializes access to.
///
/// One implementor wraps one live connection; the session task is the only
/// caller, so methods take `&mut self` and implementors need no internal
/// locking. Errors are returned as values and must leave the connection
/// usable for the next call wherever the underlying client guarantees that.
#[async_trait]
pub trait SessionClient: Send {
    /// Run a possibly multi-statement query string over the simple
    /// protocol.
    async fn simple_query(&mut self, sql: &str) -> Result<SimpleQueryResponse, SessionError>;

    /// Run a single statement over the extended protocol without binding
    /// any parameters.
    async fn query(&mut self, sql: &str) -> Result<RawQueryResult, SessionError>;

    /// Run a single statement over the extended protocol with the given
    /// parameter values.
    async fn query_with_params(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<RawQueryResult, SessionError>;

    /// Register a named prepared statement.
    async fn prepare(
        &mut self,
        name: &str,
        sql: &str,
        param_types: &[SqlType],
    ) -> Result<PreparedStatement, SessionError>;

    /// Bind parameter values to a prepared statement under a portal name.
    async fn bind(
        &mut self,
        statement: &PreparedStatement,
        portal: &str,
        params: &[SqlValue],
    ) -> Result<(), SessionError>;

    /// Execute a bound portal, returning at most `max_rows` rows
    /// (`0` = unlimited).
    async fn execute(
        &mut self,
        statement: &PreparedStatement,
        portal: &str,
        max_rows: u32,
    ) -> Result<ExecuteOutcome, SessionError>;

    /// Execute several bound portals in one exchange. The outer error covers
    /// transport-level failure; per-item outcomes carry their own results.
    async fn execute_batch(
        &mut self,
        items: &[ExecuteSpec],
    ) -> Result<Vec<Result<ExecuteOutcome, SessionError>>, SessionError>;

    /// Close a prepared statement.
    async fn close_statement(
        &mut self,
        statement: &PreparedStatement,
    ) -> Result<(), SessionError>;

    /// Close a named statement or portal.
    async fn close(&mut self, kind: CloseKind, name: &str) -> Result<(), SessionError>;

    /// Protocol checkpoint flushing pending statement/portal state.
    async fn sync(&mut self) -> Result<(), SessionError>;

    /// Close the connection; called exactly once, when the session stops.
    async fn terminate(&mut self) -> Result<(), SessionError>;
}
