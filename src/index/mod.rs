//! Composite index subsystem
//!
//! Indexes are ordered, multi-field, in-memory structures that range cursors
//! seek into by partial key.
//!
//! # Design Principles
//!
//! - Deterministic: total value order, ties broken by object id
//! - Declared directions: each field is ascending or descending
//! - Leased reads: cursors borrow the index, writers wait
//!
//! # Invariants
//!
//! - Seek parameters always form a prefix of the index fields
//! - Missing fields are indexed as null

mod definition;
mod errors;
mod key;
mod memory;
mod seek;
mod sort_order;

pub use definition::{IndexDefinition, IndexField};
pub use errors::{IndexError, IndexResult};
pub use key::{FieldValue, ValueStep};
pub use memory::{IndexLease, MemoryCursor, MemoryIndex, SharedIndex};
pub use seek::{SearchParam, SeekIndex};
pub use sort_order::{reverse_sort_order, same_sort_order, SortDirection, SortSpec};
