use std::collections::HashMap;

use async_trait::async_trait;
use tokio_postgres::types::Type;
use tokio_postgres::{Client, NoTls, Statement, Transaction};
use tracing::warn;

use crate::client::{
    ExecuteOutcome, ExecuteSpec, PreparedStatement, RawQueryResult, SessionClient,
    SimpleQueryResponse,
};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::types::{CloseKind, SqlType, SqlValue};

use super::config::pg_config;
use super::params::{Params, pg_type, sql_type_of};
use super::query::{column_infos, fold_simple_messages, positional_rows};

/// Parameter values bound under a portal name, waiting for execute.
///
/// The protocol client scopes portals to transactions, so the bind itself
/// is replayed inside a transaction when the portal is executed.
struct BoundPortal {
    statement: String,
    params: Vec<SqlValue>,
}

/// [`SessionClient`] over one live `tokio_postgres` connection.
///
/// Holds the registries for named prepared statements and bound portals;
/// the session task is the only caller, so neither needs locking.
pub struct PostgresSessionClient {
    client: Client,
    statements: HashMap<String, Statement>,
    portals: HashMap<String, BoundPortal>,
}

impl PostgresSessionClient {
    /// Open a connection per the configuration and spawn its driver task.
    ///
    /// # Errors
    /// Returns [`SessionError`] if the configuration is incomplete or the
    /// connection cannot be established within the connect timeout.
    pub async fn connect(config: &SessionConfig) -> Result<Self, SessionError> {
        let pg = pg_config(config)?;
        let (client, connection) = pg.connect(NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                warn!("postgres connection driver exited with error: {err}");
            }
        });
        Ok(PostgresSessionClient {
            client,
            statements: HashMap::new(),
            portals: HashMap::new(),
        })
    }

    async fn run_prepared(
        &self,
        stmt: &Statement,
        params: &[SqlValue],
    ) -> Result<RawQueryResult, SessionError> {
        let converted = Params::convert(params);
        if stmt.columns().is_empty() {
            let affected = self.client.execute(stmt, converted.as_refs()).await?;
            return Ok(RawQueryResult::Affected(affected));
        }
        let rows = self.client.query(stmt, converted.as_refs()).await?;
        Ok(RawQueryResult::Rows {
            columns: column_infos(stmt),
            rows: positional_rows(&rows)?,
        })
    }
}

#[async_trait]
impl SessionClient for PostgresSessionClient {
    async fn simple_query(&mut self, sql: &str) -> Result<SimpleQueryResponse, SessionError> {
        let messages = self.client.simple_query(sql).await?;
        fold_simple_messages(messages)
    }

    async fn query(&mut self, sql: &str) -> Result<RawQueryResult, SessionError> {
        // Prepared even for the one-shot path so column metadata is
        // available when a statement returns zero rows.
        let stmt = self.client.prepare(sql).await?;
        self.run_prepared(&stmt, &[]).await
    }

    async fn query_with_params(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<RawQueryResult, SessionError> {
        let stmt = self.client.prepare(sql).await?;
        self.run_prepared(&stmt, params).await
    }

    async fn prepare(
        &mut self,
        name: &str,
        sql: &str,
        param_types: &[SqlType],
    ) -> Result<PreparedStatement, SessionError> {
        // Named statements follow server semantics: duplicates are
        // rejected, the unnamed statement may be re-prepared.
        if !name.is_empty() && self.statements.contains_key(name) {
            return Err(SessionError::ExecutionError(format!(
                "prepared statement {name:?} already exists"
            )));
        }
        let stmt = if param_types.is_empty() {
            self.client.prepare(sql).await?
        } else {
            let types: Vec<Type> = param_types.iter().copied().map(pg_type).collect();
            self.client.prepare_typed(sql, &types).await?
        };
        let descriptor = PreparedStatement::new(
            name,
            stmt.params().iter().map(sql_type_of).collect(),
            column_infos(&stmt),
        );
        self.statements.insert(name.to_owned(), stmt);
        Ok(descriptor)
    }

    async fn bind(
        &mut self,
        statement: &PreparedStatement,
        portal: &str,
        params: &[SqlValue],
    ) -> Result<(), SessionError> {
        if !self.statements.contains_key(&statement.name) {
            return Err(SessionError::ExecutionError(format!(
                "unknown prepared statement {:?}",
                statement.name
            )));
        }
        // Named portals reject rebinding; the unnamed portal may be
        // rebound, replacing the previous bind.
        if !portal.is_empty() && self.portals.contains_key(portal) {
            return Err(SessionError::ExecutionError(format!(
                "portal {portal:?} is already bound"
            )));
        }
        self.portals.insert(
            portal.to_owned(),
            BoundPortal {
                statement: statement.name.clone(),
                params: params.to_vec(),
            },
        );
        Ok(())
    }

    async fn execute(
        &mut self,
        statement: &PreparedStatement,
        portal: &str,
        max_rows: u32,
    ) -> Result<ExecuteOutcome, SessionError> {
        let (stmt, params) =
            resolve_portal(&self.statements, &self.portals, statement, portal)?;
        let tx = self.client.transaction().await?;
        let outcome = run_portal_exchange(&tx, &stmt, &params, max_rows).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    async fn execute_batch(
        &mut self,
        items: &[ExecuteSpec],
    ) -> Result<Vec<Result<ExecuteOutcome, SessionError>>, SessionError> {
        let tx = self.client.transaction().await?;
        let mut outcomes = Vec::with_capacity(items.len());
        let mut failed = false;
        for item in items {
            if failed {
                outcomes.push(Err(SessionError::ExecutionError(
                    "batch aborted by an earlier failure".to_string(),
                )));
                continue;
            }
            let outcome = match resolve_portal(
                &self.statements,
                &self.portals,
                &item.statement,
                &item.portal,
            ) {
                Ok((stmt, params)) => {
                    run_portal_exchange(&tx, &stmt, &params, item.max_rows).await
                }
                Err(err) => Err(err),
            };
            failed = outcome.is_err();
            outcomes.push(outcome);
        }
        if failed {
            tx.rollback().await?;
        } else {
            tx.commit().await?;
        }
        Ok(outcomes)
    }

    async fn close_statement(
        &mut self,
        statement: &PreparedStatement,
    ) -> Result<(), SessionError> {
        // Dropping the handle sends the protocol Close; a miss already
        // means closed, which the protocol treats as success too.
        self.statements.remove(&statement.name);
        Ok(())
    }

    async fn close(&mut self, kind: CloseKind, name: &str) -> Result<(), SessionError> {
        match kind {
            CloseKind::Statement => {
                self.statements.remove(name);
            }
            CloseKind::Portal => {
                self.portals.remove(name);
            }
        }
        Ok(())
    }

    async fn sync(&mut self) -> Result<(), SessionError> {
        // The protocol client issues Sync itself after every
        // extended-protocol exchange; there is nothing left to flush.
        Ok(())
    }

    async fn terminate(&mut self) -> Result<(), SessionError> {
        self.statements.clear();
        self.portals.clear();
        // The socket closes when the client is dropped right after this.
        Ok(())
    }
}

fn resolve_portal(
    statements: &HashMap<String, Statement>,
    portals: &HashMap<String, BoundPortal>,
    statement: &PreparedStatement,
    portal: &str,
) -> Result<(Statement, Vec<SqlValue>), SessionError> {
    let bound = portals.get(portal).ok_or_else(|| {
        SessionError::ExecutionError(format!("portal {portal:?} is not bound"))
    })?;
    if bound.statement != statement.name {
        return Err(SessionError::ExecutionError(format!(
            "portal {portal:?} is bound to statement {:?}, not {:?}",
            bound.statement, statement.name
        )));
    }
    let stmt = statements
        .get(&statement.name)
        .ok_or_else(|| {
            SessionError::ExecutionError(format!(
                "unknown prepared statement {:?}",
                statement.name
            ))
        })?
        .clone();
    Ok((stmt, bound.params.clone()))
}

async fn run_portal_exchange(
    tx: &Transaction<'_>,
    stmt: &Statement,
    params: &[SqlValue],
    max_rows: u32,
) -> Result<ExecuteOutcome, SessionError> {
    let converted = Params::convert(params);
    if stmt.columns().is_empty() {
        let affected = tx.execute(stmt, converted.as_refs()).await?;
        return Ok(ExecuteOutcome::Affected(affected));
    }
    let portal = tx.bind(stmt, converted.as_refs()).await?;
    // query_portal treats 0 as "no limit", matching the session contract.
    let fetch = i32::try_from(max_rows).unwrap_or(i32::MAX);
    let rows = tx.query_portal(&portal, fetch).await?;
    let values = positional_rows(&rows)?;
    if max_rows > 0 && values.len() == max_rows as usize {
        Ok(ExecuteOutcome::Suspended(values))
    } else {
        Ok(ExecuteOutcome::Complete(values))
    }
}
