//! Cursor contract shared by index sub-cursors, range cursors and decorators

use uuid::Uuid;

use crate::range::FieldAccessor;

use super::errors::CursorResult;

/// Identifier of a stored object.
pub type ObjectId = Uuid;

/// Bidirectional, stateful enumeration over records.
///
/// A cursor is driven by one caller at a time. The borrow it holds on its
/// index is the read lease; the index cannot change while the cursor lives.
pub trait Cursor<R> {
    /// The record the cursor is positioned on, if any.
    fn current(&self) -> Option<&R>;

    /// Accessor able to read fields of the current record.
    fn current_accessor(&self) -> &dyn FieldAccessor<R>;

    /// Whether the current record has the shape the caller expects.
    fn current_type_compatible(&self) -> bool;

    /// Object identifier of the current record.
    fn current_object_id(&self) -> Option<ObjectId>;

    /// Advances to the next record. Returns false when exhausted.
    fn move_next(&mut self) -> CursorResult<bool>;

    /// Steps back to the previous record. Returns false when exhausted.
    fn move_previous(&mut self) -> CursorResult<bool>;

    /// Returns the cursor to its initial state.
    fn reset(&mut self);

    /// Resumes enumeration after `item` (keyset pagination).
    fn continue_after(&mut self, item: &R) -> CursorResult<()>;

    /// Resumes backward enumeration before `item`.
    fn continue_before(&mut self, item: &R) -> CursorResult<()>;
}

impl<R, C: Cursor<R> + ?Sized> Cursor<R> for Box<C> {
    fn current(&self) -> Option<&R> {
        (**self).current()
    }

    fn current_accessor(&self) -> &dyn FieldAccessor<R> {
        (**self).current_accessor()
    }

    fn current_type_compatible(&self) -> bool {
        (**self).current_type_compatible()
    }

    fn current_object_id(&self) -> Option<ObjectId> {
        (**self).current_object_id()
    }

    fn move_next(&mut self) -> CursorResult<bool> {
        (**self).move_next()
    }

    fn move_previous(&mut self) -> CursorResult<bool> {
        (**self).move_previous()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn continue_after(&mut self, item: &R) -> CursorResult<()> {
        (**self).continue_after(item)
    }

    fn continue_before(&mut self, item: &R) -> CursorResult<()> {
        (**self).continue_before(item)
    }
}
