//! Serialized access to a single database connection.
//!
//! A [`Session`] owns one live connection behind a task and a bounded
//! mailbox: callers on any number of tasks submit operations through
//! cloneable handles, and the task runs them one at a time in arrival
//! order. Raw results come back either normalized into name-addressable
//! rows or verbatim, depending on whether the operation carries column
//! metadata.
//!
//! The connection side sits behind the [`SessionClient`] trait; the
//! `postgres` feature provides the `tokio_postgres` implementation, and
//! the `test-utils` feature provides a scriptable stub for tests.

pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod prelude;
pub mod results;
pub mod session;
#[cfg(feature = "test-utils")]
pub mod test_utils;
pub mod types;

pub use client::{
    ColumnInfo, ExecuteOutcome, ExecuteSpec, PreparedStatement, RawQueryResult, SessionClient,
    SimpleQueryResponse,
};
pub use config::{DEFAULT_QUEUE_DEPTH, SessionConfig};
pub use error::SessionError;
pub use results::{NormalizedRow, QueryReply, ResultSet, StatementOutcome, normalize};
pub use session::Session;
pub use types::{CloseKind, SqlType, SqlValue};
