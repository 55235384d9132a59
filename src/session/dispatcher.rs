use tokio::sync::mpsc::Receiver;
use tracing::debug;

use crate::client::{PreparedStatement, SessionClient};
use crate::error::SessionError;
use crate::results::{QueryReply, StatementOutcome};
use crate::types::CloseKind;

use super::channel::Request;

/// The session loop: owns the client (and through it the connection) and
/// answers requests strictly in arrival order. One request runs to
/// completion before the next is taken, which is the whole serialization
/// guarantee.
pub(super) async fn run_session<C: SessionClient>(mut client: C, mut requests: Receiver<Request>) {
    while let Some(request) = requests.recv().await {
        match request {
            Request::SimpleQuery { sql, respond_to } => {
                let result = client
                    .simple_query(&sql)
                    .await
                    .map(QueryReply::from_response);
                let _ = respond_to.send(result);
            }
            Request::ExtendedQuery {
                sql,
                params,
                respond_to,
            } => {
                // No parameters takes the unparameterized path; binding an
                // empty parameter list is not the same exchange.
                let raw = if params.is_empty() {
                    client.query(&sql).await
                } else {
                    client.query_with_params(&sql, &params).await
                };
                let _ = respond_to.send(raw.map(StatementOutcome::from_raw));
            }
            Request::Prepare {
                name,
                sql,
                param_types,
                respond_to,
            } => {
                let _ = respond_to.send(client.prepare(&name, &sql, &param_types).await);
            }
            Request::Bind {
                statement,
                portal,
                params,
                respond_to,
            } => {
                let _ = respond_to.send(client.bind(&statement, &portal, &params).await);
            }
            Request::Execute {
                statement,
                portal,
                max_rows,
                respond_to,
            } => {
                let _ = respond_to.send(client.execute(&statement, &portal, max_rows).await);
            }
            Request::ExecuteBatch { items, respond_to } => {
                let _ = respond_to.send(client.execute_batch(&items).await);
            }
            Request::CloseStatement {
                statement,
                respond_to,
            } => {
                let _ = respond_to.send(close_statement_then_sync(&mut client, &statement).await);
            }
            Request::Close {
                kind,
                name,
                respond_to,
            } => {
                let _ = respond_to.send(close_then_sync(&mut client, kind, &name).await);
            }
            Request::Stop { respond_to } => {
                let _ = respond_to.send(client.terminate().await);
                return;
            }
        }
    }

    // Every handle was dropped without an explicit stop; tear the
    // connection down on the way out.
    if let Err(err) = client.terminate().await {
        debug!("connection teardown after last session handle dropped failed: {err}");
    }
}

/// A close is only visible to the server once a sync follows it, so the two
/// are issued as one unit. A rejected close surfaces as [`SessionError::CloseFailed`]
/// and the sync is not attempted.
async fn close_statement_then_sync<C: SessionClient>(
    client: &mut C,
    statement: &PreparedStatement,
) -> Result<(), SessionError> {
    client
        .close_statement(statement)
        .await
        .map_err(|err| SessionError::CloseFailed(Box::new(err)))?;
    client.sync().await
}

async fn close_then_sync<C: SessionClient>(
    client: &mut C,
    kind: CloseKind,
    name: &str,
) -> Result<(), SessionError> {
    client
        .close(kind, name)
        .await
        .map_err(|err| SessionError::CloseFailed(Box::new(err)))?;
    client.sync().await
}
