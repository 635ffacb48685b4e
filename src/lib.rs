//! rehashmap - an in-memory associative container with incremental
//! (progressive) rehashing.
//!
//! Growing the table never performs a large, latency-spiking bulk
//! relocation: [`Dict`] migrates a bounded number of entries from its active
//! table into its growing table on every mutating or searching operation,
//! until the migration finishes and the growing table is promoted.
//!
//! Main modules:
//! - `dict` — the container itself: bucket tables, the policy binding, the
//!   rehash engine, the entry-deletion-tolerant cursor, and statistics
//!   reporting.

/// The dictionary container: bucket tables, policy binding, rehash engine,
/// cursor, and statistics reporting.
pub mod dict;

pub use dict::{
    AddOrGetExisting, AddOutcome, ClosurePolicy, ClosurePolicyBuilder, Cursor, CursorEntry,
    DefaultPolicy, DeleteOutcome, Dict, DictConfig, DictStats, Entry, OccupiedEntry, Policy,
    TableStats, UpsertOutcome, VacantEntry,
};

pub use rehashmap_error::{DictError, DictResult};
