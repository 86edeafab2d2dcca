//! Storage layer for hm
//!
//! SQLite backs every collection trait the search core consumes. Writes
//! exist for seeding and administration only.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;

pub mod facets;
pub mod migrations;
pub mod query;
pub mod seed;
pub mod sqlite;
pub mod writes;

pub use seed::{SeedData, SeedFacet, SeedReport, load_seed, load_seed_file};
pub use sqlite::Database;
pub use writes::{NewCompany, NewFacet, NewJob, NewMarketer};

/// Timestamps are stored as unix seconds.
pub(crate) fn to_timestamp(value: DateTime<Utc>) -> i64 {
    value.timestamp()
}

pub(crate) fn from_timestamp(column: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Integer,
            format!("timestamp {secs} out of range").into(),
        )
    })
}
