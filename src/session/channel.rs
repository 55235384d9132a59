use tokio::sync::oneshot;

use crate::client::{ExecuteOutcome, ExecuteSpec, PreparedStatement};
use crate::error::SessionError;
use crate::results::{QueryReply, StatementOutcome};
use crate::types::{CloseKind, SqlType, SqlValue};

pub(super) type Responder<T> = oneshot::Sender<Result<T, SessionError>>;

/// The closed set of operations a session accepts. Every request carries its
/// own reply channel; the dispatcher answers each one exactly once, in
/// arrival order.
pub(super) enum Request {
    SimpleQuery {
        sql: String,
        respond_to: Responder<QueryReply>,
    },
    ExtendedQuery {
        sql: String,
        params: Vec<SqlValue>,
        respond_to: Responder<StatementOutcome>,
    },
    Prepare {
        name: String,
        sql: String,
        param_types: Vec<SqlType>,
        respond_to: Responder<PreparedStatement>,
    },
    Bind {
        statement: PreparedStatement,
        portal: String,
        params: Vec<SqlValue>,
        respond_to: Responder<()>,
    },
    Execute {
        statement: PreparedStatement,
        portal: String,
        max_rows: u32,
        respond_to: Responder<ExecuteOutcome>,
    },
    ExecuteBatch {
        items: Vec<ExecuteSpec>,
        respond_to: Responder<Vec<Result<ExecuteOutcome, SessionError>>>,
    },
    CloseStatement {
        statement: PreparedStatement,
        respond_to: Responder<()>,
    },
    Close {
        kind: CloseKind,
        name: String,
        respond_to: Responder<()>,
    },
    Stop {
        respond_to: Responder<()>,
    },
}
