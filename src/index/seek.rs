//! Index seek primitive consumed by range cursors

use crate::cursor::{Cursor, CursorResult};
use crate::range::FieldAccessor;

use super::key::FieldValue;
use super::sort_order::{self, SortSpec};

/// One component of a partial key: `(field, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParam {
    pub field: String,
    pub value: FieldValue,
}

impl SearchParam {
    pub fn new(field: impl Into<String>, value: FieldValue) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

/// An ordered multi-field index that can position cursors by partial key.
///
/// Cursors walk the index's stored order, in which the leading field is
/// ascending. `ascending()` reports each field's declared direction.
pub trait SeekIndex {
    /// Record type held by the index
    type Record: 'static;

    /// Field names in index order
    fn field_names(&self) -> &[String];

    /// Declared direction per field, fixed at index creation
    fn ascending(&self) -> &[bool];

    /// Accessor used to read fields of stored records
    fn accessor(&self) -> &dyn FieldAccessor<Self::Record>;

    /// Cursor positioned just before the first entry `>=` params; step with `move_next`.
    fn find_first_greater_or_equal_to(
        &self,
        params: &[SearchParam],
    ) -> CursorResult<Box<dyn Cursor<Self::Record> + '_>>;

    /// Cursor positioned just after the last entry `<=` params; step with `move_previous`.
    fn find_last_lesser_or_equal_to(
        &self,
        params: &[SearchParam],
    ) -> CursorResult<Box<dyn Cursor<Self::Record> + '_>>;

    /// Whether forward enumeration already satisfies `sort_order`.
    fn same_sort_order(&self, constant_fields: &[String], sort_order: &[SortSpec]) -> bool {
        sort_order::same_sort_order(self.field_names(), self.ascending(), constant_fields, sort_order)
    }

    /// Whether backward enumeration already satisfies `sort_order`.
    fn reverse_sort_order(&self, constant_fields: &[String], sort_order: &[SortSpec]) -> bool {
        sort_order::reverse_sort_order(self.field_names(), self.ascending(), constant_fields, sort_order)
    }
}
