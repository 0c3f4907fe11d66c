//! Cursor subsystem
//!
//! - `Cursor`: stateful bidirectional enumeration contract
//! - `RangeQueryCursor`: composite range scan with seeks and bound tightening
//! - `PageCursor`: offset/limit decorator
//! - `SingletonCursor`: zero-or-one record cursor for point lookups
//!
//! # Invariants
//!
//! - A range scan yields each matching record exactly once, in index order
//! - Working bounds only tighten within one enumeration direction
//! - Direction changes require `reset()`

mod errors;
mod page;
mod range_query;
mod singleton;
mod traits;

pub use errors::{CursorError, CursorErrorCode, CursorResult};
pub use page::PageCursor;
pub use range_query::{RangeQueryCursor, RangeScanStats, ScanDirection};
pub use singleton::SingletonCursor;
pub use traits::{Cursor, ObjectId};
