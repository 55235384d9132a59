//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::client::{
    ColumnInfo, ExecuteOutcome, ExecuteSpec, PreparedStatement, RawQueryResult, SessionClient,
    SimpleQueryResponse,
};
pub use crate::config::{DEFAULT_QUEUE_DEPTH, SessionConfig};
pub use crate::error::SessionError;
pub use crate::results::{NormalizedRow, QueryReply, ResultSet, StatementOutcome, normalize};
pub use crate::session::Session;
pub use crate::types::{CloseKind, SqlType, SqlValue};

#[cfg(feature = "postgres")]
pub use crate::postgres::Params as PostgresParams;
#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresSessionClient;
