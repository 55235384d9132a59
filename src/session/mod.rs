// Session actor - one task owning one connection, one mailbox in front of it
//
// This module is split into several sub-modules:
// - channel: the request vocabulary and reply channels
// - dispatcher: the task loop that drains the mailbox in FIFO order
//
// The public face is `Session`, a cloneable handle over the mailbox sender.

mod channel;
mod dispatcher;

use tokio::sync::mpsc;
use tokio::sync::oneshot;

use crate::client::{ExecuteOutcome, ExecuteSpec, PreparedStatement, SessionClient};
use crate::config::DEFAULT_QUEUE_DEPTH;
#[cfg(feature = "postgres")]
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::results::{QueryReply, StatementOutcome};
use crate::types::{CloseKind, SqlType, SqlValue};

use channel::{Request, Responder};
use dispatcher::run_session;

/// Cloneable handle to a session task that owns one live database
/// connection.
///
/// All handles feed the same bounded mailbox; the task behind it runs one
/// request at a time in arrival order, so callers on different tasks never
/// interleave on the connection. When the mailbox is full, senders wait
/// rather than fail. Dropping every handle stops the task and closes the
/// connection.
#[derive(Debug, Clone)]
pub struct Session {
    requests: mpsc::Sender<Request>,
}

impl Session {
    /// Connect to `PostgreSQL` with the given configuration and spawn a
    /// session task around the new connection.
    ///
    /// # Errors
    /// Returns [`SessionError`] if the connection cannot be established
    /// within the configured timeout.
    #[cfg(feature = "postgres")]
    pub async fn connect(config: &SessionConfig) -> Result<Self, SessionError> {
        let client = crate::postgres::PostgresSessionClient::connect(config).await?;
        Ok(Self::spawn_with_queue_depth(client, config.queue_depth))
    }

    /// Spawn a session task around an already-constructed client, with the
    /// default mailbox depth.
    #[must_use]
    pub fn spawn<C>(client: C) -> Self
    where
        C: SessionClient + 'static,
    {
        Self::spawn_with_queue_depth(client, DEFAULT_QUEUE_DEPTH)
    }

    /// Spawn a session task with an explicit mailbox depth.
    #[must_use]
    pub fn spawn_with_queue_depth<C>(client: C, queue_depth: usize) -> Self
    where
        C: SessionClient + 'static,
    {
        // mpsc::channel panics on a zero capacity.
        let (sender, receiver) = mpsc::channel(queue_depth.max(1));
        tokio::spawn(run_session(client, receiver));
        Session { requests: sender }
    }

    /// Run a query string over the simple protocol. The string may hold
    /// several statements; the reply keeps a single statement and a batch
    /// distinct.
    ///
    /// # Errors
    /// Returns [`SessionError`] if any statement fails or the session has
    /// stopped.
    pub async fn simple_query(&self, sql: &str) -> Result<QueryReply, SessionError> {
        let sql = sql.to_owned();
        self.request(
            |respond_to| Request::SimpleQuery { sql, respond_to },
            "session closed while running simple query",
        )
        .await
    }

    /// Run one parameterized statement over the extended protocol. An empty
    /// parameter list runs the statement without a bind step.
    ///
    /// # Errors
    /// Returns [`SessionError`] if the statement fails or the session has
    /// stopped.
    pub async fn extended_query(
        &self,
        sql: &str,
        params: Vec<SqlValue>,
    ) -> Result<StatementOutcome, SessionError> {
        let sql = sql.to_owned();
        self.request(
            |respond_to| Request::ExtendedQuery {
                sql,
                params,
                respond_to,
            },
            "session closed while running extended query",
        )
        .await
    }

    /// Prepare a named statement on the session's connection. Parameter
    /// types left as [`SqlType::Unspecified`] are inferred by the server.
    ///
    /// # Errors
    /// Returns [`SessionError`] if preparation fails or the session has
    /// stopped.
    pub async fn prepare(
        &self,
        name: &str,
        sql: &str,
        param_types: Vec<SqlType>,
    ) -> Result<PreparedStatement, SessionError> {
        let name = name.to_owned();
        let sql = sql.to_owned();
        self.request(
            |respond_to| Request::Prepare {
                name,
                sql,
                param_types,
                respond_to,
            },
            "session closed while preparing statement",
        )
        .await
    }

    /// Bind parameter values to a prepared statement under a portal name.
    ///
    /// # Errors
    /// Returns [`SessionError`] if the bind fails or the session has
    /// stopped.
    pub async fn bind(
        &self,
        statement: &PreparedStatement,
        portal: &str,
        params: Vec<SqlValue>,
    ) -> Result<(), SessionError> {
        let statement = statement.clone();
        let portal = portal.to_owned();
        self.request(
            |respond_to| Request::Bind {
                statement,
                portal,
                params,
                respond_to,
            },
            "session closed while binding portal",
        )
        .await
    }

    /// Execute a bound portal, fetching at most `max_rows` rows
    /// (`0` = unlimited). A capped fetch that leaves rows behind reports
    /// [`ExecuteOutcome::Suspended`].
    ///
    /// # Errors
    /// Returns [`SessionError`] if execution fails or the session has
    /// stopped.
    pub async fn execute(
        &self,
        statement: &PreparedStatement,
        portal: &str,
        max_rows: u32,
    ) -> Result<ExecuteOutcome, SessionError> {
        let statement = statement.clone();
        let portal = portal.to_owned();
        self.request(
            |respond_to| Request::Execute {
                statement,
                portal,
                max_rows,
                respond_to,
            },
            "session closed while executing portal",
        )
        .await
    }

    /// Execute several bound portals in one exchange, returning one outcome
    /// per item in order.
    ///
    /// # Errors
    /// The outer [`SessionError`] covers transport-level failure or a
    /// stopped session; per-item failures are reported inside the list.
    pub async fn execute_batch(
        &self,
        items: Vec<ExecuteSpec>,
    ) -> Result<Vec<Result<ExecuteOutcome, SessionError>>, SessionError> {
        self.request(
            |respond_to| Request::ExecuteBatch { items, respond_to },
            "session closed while executing batch",
        )
        .await
    }

    /// Close a prepared statement and checkpoint the connection. Closing a
    /// statement that is already gone succeeds.
    ///
    /// # Errors
    /// Returns [`SessionError::CloseFailed`] if the close itself is
    /// rejected; the checkpoint is then not attempted.
    pub async fn close_statement(
        &self,
        statement: &PreparedStatement,
    ) -> Result<(), SessionError> {
        let statement = statement.clone();
        self.request(
            |respond_to| Request::CloseStatement {
                statement,
                respond_to,
            },
            "session closed while closing statement",
        )
        .await
    }

    /// Close a named statement or portal and checkpoint the connection.
    ///
    /// # Errors
    /// Returns [`SessionError::CloseFailed`] if the close itself is
    /// rejected; the checkpoint is then not attempted.
    pub async fn close(&self, kind: CloseKind, name: &str) -> Result<(), SessionError> {
        let name = name.to_owned();
        self.request(
            |respond_to| Request::Close {
                kind,
                name,
                respond_to,
            },
            "session closed while closing by name",
        )
        .await
    }

    /// [`Session::close`] with the kind given as text (`"statement"` or
    /// `"portal"`). Anything else is rejected before reaching the
    /// connection.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidArgument`] for an unknown kind, or
    /// whatever [`Session::close`] returns.
    pub async fn close_named(&self, kind: &str, name: &str) -> Result<(), SessionError> {
        let kind: CloseKind = kind.parse()?;
        self.close(kind, name).await
    }

    /// Stop the session: close the connection and end the task. Requests
    /// already queued behind the stop are answered with
    /// [`SessionError::SessionClosed`], as is any later use of a surviving
    /// handle.
    ///
    /// # Errors
    /// Returns [`SessionError`] if closing the connection fails; the
    /// session is stopped either way.
    pub async fn stop(self) -> Result<(), SessionError> {
        self.request(
            |respond_to| Request::Stop { respond_to },
            "session closed before stop completed",
        )
        .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Responder<T>) -> Request,
        drop_message: &'static str,
    ) -> Result<T, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(build(tx))
            .await
            .map_err(|_| SessionError::closed(drop_message))?;
        rx.await.map_err(|_| SessionError::closed(drop_message))?
    }
}
