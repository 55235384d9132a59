use thiserror::Error;

/// Error type shared by every session operation.
///
/// Database-level failures from the underlying client are passed through to
/// the caller unchanged; the session stays alive and keeps serving requests
/// after returning one.
#[derive(Debug, Error)]
pub enum SessionError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    /// The close step of a close-then-sync operation was rejected, so sync
    /// was never attempted. Wraps the client error from the close call.
    #[error("Close rejected before sync: {0}")]
    CloseFailed(#[source] Box<SessionError>),

    /// The session has stopped (or every handle was dropped) and the
    /// operation was never dispatched.
    #[error("Session closed: {0}")]
    SessionClosed(String),
}

impl SessionError {
    pub(crate) fn closed(context: &str) -> Self {
        SessionError::SessionClosed(context.to_string())
    }
}
