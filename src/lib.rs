//! rangeseek - composite range queries over ordered multi-field indexes
//!
//! A `RangeQueryCursor` turns one range per leading index field into a
//! minimal sequence of index seeks, skipping runs of entries that cannot
//! match instead of filtering them one by one.

pub mod cli;
pub mod config;
pub mod cursor;
pub mod index;
pub mod observability;
pub mod range;
