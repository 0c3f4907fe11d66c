//! Range model for composite index scans
//!
//! - `RangeInfo`: per-field point or min/max constraint, value-copied per scan
//! - `FieldFilter` / `ApplicableFilter`: predicates evaluated against records
//! - `FieldAccessor`: typed field lookup replacing reflective access

mod accessor;
mod filter;
mod range_info;

pub use accessor::{FieldAccessor, JsonAccessor, SharedAccessor};
pub use filter::{ApplicableFilter, FieldFilter, FilterOp};
pub use range_info::{RangeBound, RangeInfo};
