//! CSV export layer for tmdbetl.
//!
//! Defines the flat record shapes of the three output tables and
//! writes them with `csv`, one file per table and media type.

/// Flat output record types.
pub mod records;
mod writer;

pub use records::{Detail, PopularItem, Review, TableRecord};
pub use writer::{OutputLayout, WrittenTables, write_table, write_tables};
