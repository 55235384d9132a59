// PostgreSQL adapter - implements the session client seam over tokio-postgres
//
// This module is split into several sub-modules:
// - config: translation of session configuration into connect settings
// - params: parameter conversion between session values and wire types
// - query: result extraction and simple-protocol message folding
// - client: the connection-owning client with its statement/portal registries

pub mod client;
mod config;
pub mod params;
mod query;

// Re-export the public API
pub use client::PostgresSessionClient;
pub use params::Params;
