//! Scriptable [`SessionClient`] stub plus a shared call journal, for tests
//! that need to observe exactly what a session does to its connection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::{
    ColumnInfo, ExecuteOutcome, ExecuteSpec, PreparedStatement, RawQueryResult, SessionClient,
    SimpleQueryResponse,
};
use crate::error::SessionError;
use crate::types::{CloseKind, SqlType, SqlValue};

/// One recorded client call: the operation name plus a short rendering of
/// the argument that identifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
    pub op: &'static str,
    pub detail: String,
}

#[derive(Debug, Default)]
struct CallLogInner {
    calls: Vec<StubCall>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Shared journal of every call a [`StubClient`] served, in completion
/// order.
///
/// Also tracks how many calls were ever in flight at once; a session that
/// serializes correctly never lets this exceed one, no matter how many
/// callers it has.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    inner: Arc<Mutex<CallLogInner>>,
}

impl CallLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StubCall> {
        self.lock().calls.clone()
    }

    /// Just the operation names, in completion order.
    #[must_use]
    pub fn ops(&self) -> Vec<&'static str> {
        self.lock().calls.iter().map(|call| call.op).collect()
    }

    /// Highest number of calls that were ever running concurrently.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.lock().max_in_flight
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().calls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().calls.is_empty()
    }

    fn begin(&self) {
        let mut inner = self.lock();
        inner.in_flight += 1;
        inner.max_in_flight = inner.max_in_flight.max(inner.in_flight);
    }

    fn finish(&self, op: &'static str, detail: String) {
        let mut inner = self.lock();
        inner.in_flight -= 1;
        inner.calls.push(StubCall { op, detail });
    }

    fn lock(&self) -> MutexGuard<'_, CallLogInner> {
        self.inner.lock().expect("call log mutex poisoned")
    }
}

/// Scriptable [`SessionClient`] for session tests.
///
/// Each operation pops its next scripted result, or synthesizes a benign
/// success when nothing was scripted, so tests only script the calls they
/// care about. An optional per-call latency widens the window in which a
/// non-serializing session would overlap calls.
#[derive(Default)]
pub struct StubClient {
    log: CallLog,
    latency: Option<Duration>,
    closed: bool,
    simple_results: VecDeque<Result<SimpleQueryResponse, SessionError>>,
    query_results: VecDeque<Result<RawQueryResult, SessionError>>,
    prepare_results: VecDeque<Result<PreparedStatement, SessionError>>,
    bind_results: VecDeque<Result<(), SessionError>>,
    execute_results: VecDeque<Result<ExecuteOutcome, SessionError>>,
    batch_results: VecDeque<Result<Vec<Result<ExecuteOutcome, SessionError>>, SessionError>>,
    close_results: VecDeque<Result<(), SessionError>>,
    sync_results: VecDeque<Result<(), SessionError>>,
    terminate_results: VecDeque<Result<(), SessionError>>,
}

impl StubClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle to the journal this client writes to.
    #[must_use]
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Sleep this long inside every call before completing it.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    #[must_use]
    pub fn with_simple_result(
        mut self,
        result: Result<SimpleQueryResponse, SessionError>,
    ) -> Self {
        self.simple_results.push_back(result);
        self
    }

    /// Scripts both `query` and `query_with_params`; they share one queue.
    #[must_use]
    pub fn with_query_result(mut self, result: Result<RawQueryResult, SessionError>) -> Self {
        self.query_results.push_back(result);
        self
    }

    #[must_use]
    pub fn with_prepare_result(
        mut self,
        result: Result<PreparedStatement, SessionError>,
    ) -> Self {
        self.prepare_results.push_back(result);
        self
    }

    #[must_use]
    pub fn with_bind_result(mut self, result: Result<(), SessionError>) -> Self {
        self.bind_results.push_back(result);
        self
    }

    #[must_use]
    pub fn with_execute_result(
        mut self,
        result: Result<ExecuteOutcome, SessionError>,
    ) -> Self {
        self.execute_results.push_back(result);
        self
    }

    #[must_use]
    pub fn with_batch_result(
        mut self,
        result: Result<Vec<Result<ExecuteOutcome, SessionError>>, SessionError>,
    ) -> Self {
        self.batch_results.push_back(result);
        self
    }

    /// Scripts both `close_statement` and `close`; they share one queue.
    #[must_use]
    pub fn with_close_result(mut self, result: Result<(), SessionError>) -> Self {
        self.close_results.push_back(result);
        self
    }

    #[must_use]
    pub fn with_sync_result(mut self, result: Result<(), SessionError>) -> Self {
        self.sync_results.push_back(result);
        self
    }

    #[must_use]
    pub fn with_terminate_result(mut self, result: Result<(), SessionError>) -> Self {
        self.terminate_results.push_back(result);
        self
    }

    async fn observe<T>(
        &self,
        op: &'static str,
        detail: impl Into<String>,
        result: Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        assert!(!self.closed, "stub client used after terminate");
        self.log.begin();
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.log.finish(op, detail.into());
        result
    }
}

#[async_trait]
impl SessionClient for StubClient {
    async fn simple_query(&mut self, sql: &str) -> Result<SimpleQueryResponse, SessionError> {
        let result = self
            .simple_results
            .pop_front()
            .unwrap_or(Ok(SimpleQueryResponse::Single(RawQueryResult::Done)));
        self.observe("simple_query", sql, result).await
    }

    async fn query(&mut self, sql: &str) -> Result<RawQueryResult, SessionError> {
        let result = self
            .query_results
            .pop_front()
            .unwrap_or(Ok(RawQueryResult::Done));
        self.observe("query", sql, result).await
    }

    async fn query_with_params(
        &mut self,
        sql: &str,
        _params: &[SqlValue],
    ) -> Result<RawQueryResult, SessionError> {
        let result = self
            .query_results
            .pop_front()
            .unwrap_or(Ok(RawQueryResult::Done));
        self.observe("query_with_params", sql, result).await
    }

    async fn prepare(
        &mut self,
        name: &str,
        _sql: &str,
        param_types: &[SqlType],
    ) -> Result<PreparedStatement, SessionError> {
        let result = self.prepare_results.pop_front().unwrap_or_else(|| {
            Ok(PreparedStatement::new(name, param_types.to_vec(), Vec::new()))
        });
        self.observe("prepare", name, result).await
    }

    async fn bind(
        &mut self,
        _statement: &PreparedStatement,
        portal: &str,
        _params: &[SqlValue],
    ) -> Result<(), SessionError> {
        let result = self.bind_results.pop_front().unwrap_or(Ok(()));
        self.observe("bind", portal, result).await
    }

    async fn execute(
        &mut self,
        _statement: &PreparedStatement,
        portal: &str,
        _max_rows: u32,
    ) -> Result<ExecuteOutcome, SessionError> {
        let result = self
            .execute_results
            .pop_front()
            .unwrap_or(Ok(ExecuteOutcome::Complete(Vec::new())));
        self.observe("execute", portal, result).await
    }

    async fn execute_batch(
        &mut self,
        items: &[ExecuteSpec],
    ) -> Result<Vec<Result<ExecuteOutcome, SessionError>>, SessionError> {
        let result = self.batch_results.pop_front().unwrap_or_else(|| {
            Ok(items
                .iter()
                .map(|_| Ok(ExecuteOutcome::Complete(Vec::new())))
                .collect())
        });
        self.observe("execute_batch", format!("{} items", items.len()), result)
            .await
    }

    async fn close_statement(
        &mut self,
        statement: &PreparedStatement,
    ) -> Result<(), SessionError> {
        let result = self.close_results.pop_front().unwrap_or(Ok(()));
        self.observe("close_statement", statement.name.clone(), result)
            .await
    }

    async fn close(&mut self, kind: CloseKind, name: &str) -> Result<(), SessionError> {
        let result = self.close_results.pop_front().unwrap_or(Ok(()));
        self.observe("close", format!("{kind} {name}"), result).await
    }

    async fn sync(&mut self) -> Result<(), SessionError> {
        let result = self.sync_results.pop_front().unwrap_or(Ok(()));
        self.observe("sync", String::new(), result).await
    }

    async fn terminate(&mut self) -> Result<(), SessionError> {
        let result = self.terminate_results.pop_front().unwrap_or(Ok(()));
        let outcome = self.observe("terminate", String::new(), result).await;
        self.closed = true;
        outcome
    }
}

/// Statement descriptor with no parameters or columns, for tests that only
/// care about the name.
#[must_use]
pub fn test_statement(name: &str) -> PreparedStatement {
    PreparedStatement::new(name, Vec::new(), Vec::new())
}

/// `Rows` result with text-typed columns, for scripting query replies.
#[must_use]
pub fn rows_result(columns: &[&str], rows: Vec<Vec<SqlValue>>) -> RawQueryResult {
    RawQueryResult::Rows {
        columns: columns
            .iter()
            .map(|name| ColumnInfo::new(*name, "text"))
            .collect(),
        rows,
    }
}
