//! An in-memory, incrementally-rehashing associative container.
//!
//! [`Dict`] is the entry point. It stores key/value pairs in two bucket
//! tables ([`table`]) and migrates entries from one to the other a few at a
//! time, spreading the cost of growth across the operations that trigger it
//! instead of paying for it all at once. Hashing, equality, and optional
//! release hooks are supplied by a [`Policy`] rather than by a trait bound on
//! `K`/`V` directly, so the same engine serves both statically-typed callers
//! ([`DefaultPolicy`]) and callers assembling behavior at runtime
//! ([`ClosurePolicy`]).

mod config;
mod cursor;
mod engine;
mod entry;
mod policy;
mod stats;
mod table;

pub use config::DictConfig;
pub use cursor::{Cursor, CursorEntry};
pub use engine::{AddOrGetExisting, AddOutcome, DeleteOutcome, Dict, UpsertOutcome};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use policy::{ClosurePolicy, ClosurePolicyBuilder, DefaultPolicy, Policy};
pub use stats::{DictStats, TableStats};
