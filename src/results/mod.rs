// Result normalization - turns raw client results into name-addressable rows
//
// This module is split into several sub-modules:
// - row: a single row pairing shared column names with positional values
// - result_set: an ordered collection of normalized rows
// - normalize: the pure zip of column descriptors with row tuples
// - outcome: reply shapes the session hands back to callers

pub mod normalize;
pub mod outcome;
pub mod result_set;
pub mod row;

// Re-export the public API
pub use normalize::normalize;
pub use outcome::{QueryReply, StatementOutcome};
pub use result_set::ResultSet;
pub use row::NormalizedRow;
