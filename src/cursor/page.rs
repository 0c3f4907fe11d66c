//! Offset/limit windowing over any cursor

use std::marker::PhantomData;

use crate::range::FieldAccessor;

use super::errors::CursorResult;
use super::traits::{Cursor, ObjectId};

/// Skips the first `offset` compatible records of the inner cursor and yields
/// at most `max_count` after that, in inner order.
///
/// Paging is forward-only: `move_previous` pages exactly like `move_next`.
pub struct PageCursor<R, C: Cursor<R>> {
    inner: C,
    offset: usize,
    max_count: usize,
    initial_offset: usize,
    initial_max_count: usize,
    _record: PhantomData<fn() -> R>,
}

impl<R, C: Cursor<R>> PageCursor<R, C> {
    pub fn new(inner: C, offset: usize, max_count: usize) -> Self {
        Self {
            inner,
            offset,
            max_count,
            initial_offset: offset,
            initial_max_count: max_count,
            _record: PhantomData,
        }
    }

    /// Records still to be skipped
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Records still allowed
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn advance(&mut self) -> CursorResult<bool> {
        loop {
            if self.max_count == 0 {
                return Ok(false);
            }
            if !self.inner.move_next()? {
                return Ok(false);
            }
            if !self.inner.current_type_compatible() {
                continue;
            }
            if self.offset > 0 {
                self.offset -= 1;
                continue;
            }
            self.max_count -= 1;
            return Ok(true);
        }
    }
}

impl<R, C: Cursor<R>> Cursor<R> for PageCursor<R, C> {
    fn current(&self) -> Option<&R> {
        self.inner.current()
    }

    fn current_accessor(&self) -> &dyn FieldAccessor<R> {
        self.inner.current_accessor()
    }

    fn current_type_compatible(&self) -> bool {
        self.inner.current_type_compatible()
    }

    fn current_object_id(&self) -> Option<ObjectId> {
        self.inner.current_object_id()
    }

    fn move_next(&mut self) -> CursorResult<bool> {
        self.advance()
    }

    fn move_previous(&mut self) -> CursorResult<bool> {
        self.advance()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.offset = self.initial_offset;
        self.max_count = self.initial_max_count;
    }

    fn continue_after(&mut self, item: &R) -> CursorResult<()> {
        self.inner.continue_after(item)
    }

    fn continue_before(&mut self, item: &R) -> CursorResult<()> {
        self.inner.continue_before(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::SingletonCursor;
    use crate::index::FieldValue;
    use crate::range::JsonAccessor;
    use serde_json::{json, Value};
    use std::sync::Arc;

    /// Plain list cursor used to drive the decorator.
    struct ListCursor {
        items: Vec<(Value, bool)>,
        pos: Option<usize>,
        started: bool,
    }

    impl ListCursor {
        fn new(items: Vec<(Value, bool)>) -> Self {
            Self {
                items,
                pos: None,
                started: false,
            }
        }
    }

    impl Cursor<Value> for ListCursor {
        fn current(&self) -> Option<&Value> {
            self.pos.and_then(|p| self.items.get(p)).map(|(v, _)| v)
        }

        fn current_accessor(&self) -> &dyn FieldAccessor<Value> {
            &JsonAccessor
        }

        fn current_type_compatible(&self) -> bool {
            self.pos.and_then(|p| self.items.get(p)).map_or(false, |(_, c)| *c)
        }

        fn current_object_id(&self) -> Option<ObjectId> {
            None
        }

        fn move_next(&mut self) -> CursorResult<bool> {
            let next = if self.started { self.pos.map_or(0, |p| p + 1) } else { 0 };
            self.started = true;
            if next < self.items.len() {
                self.pos = Some(next);
                Ok(true)
            } else {
                self.pos = None;
                Ok(false)
            }
        }

        fn move_previous(&mut self) -> CursorResult<bool> {
            self.move_next()
        }

        fn reset(&mut self) {
            self.pos = None;
            self.started = false;
        }

        fn continue_after(&mut self, _item: &Value) -> CursorResult<()> {
            Ok(())
        }

        fn continue_before(&mut self, _item: &Value) -> CursorResult<()> {
            Ok(())
        }
    }

    fn numbers(n: i64) -> ListCursor {
        ListCursor::new((0..n).map(|i| (json!(i), true)).collect())
    }

    fn drain<C: Cursor<Value>>(cursor: &mut C) -> Vec<i64> {
        let mut out = Vec::new();
        while cursor.move_next().unwrap() {
            out.push(cursor.current().unwrap().as_i64().unwrap());
        }
        out
    }

    #[test]
    fn test_page_window() {
        let mut page = PageCursor::new(numbers(10), 3, 4);
        assert_eq!(drain(&mut page), vec![3, 4, 5, 6]);
        assert!(!page.move_next().unwrap());
    }

    #[test]
    fn test_page_clipped_to_inner() {
        assert_eq!(drain(&mut PageCursor::new(numbers(5), 3, 10)), vec![3, 4]);
        assert!(drain(&mut PageCursor::new(numbers(5), 5, 10)).is_empty());
        assert!(drain(&mut PageCursor::new(numbers(5), 0, 0)).is_empty());
    }

    #[test]
    fn test_page_skips_incompatible() {
        let inner = ListCursor::new(vec![
            (json!(0), true),
            (json!(1), false),
            (json!(2), true),
            (json!(3), false),
            (json!(4), true),
        ]);
        assert_eq!(drain(&mut PageCursor::new(inner, 1, 5)), vec![2, 4]);
    }

    #[test]
    fn test_move_previous_pages_forward() {
        let mut page = PageCursor::new(numbers(6), 1, 2);
        assert!(page.move_previous().unwrap());
        assert_eq!(page.current(), Some(&json!(1)));
        assert!(page.move_previous().unwrap());
        assert_eq!(page.current(), Some(&json!(2)));
        assert!(!page.move_previous().unwrap());
    }

    #[test]
    fn test_reset_restores_window() {
        let mut page = PageCursor::new(numbers(6), 2, 2);
        assert_eq!(drain(&mut page), vec![2, 3]);
        assert_eq!(page.max_count(), 0);
        page.reset();
        assert_eq!(page.offset(), 2);
        assert_eq!(drain(&mut page), vec![2, 3]);
    }

    #[test]
    fn test_page_over_singleton() {
        let single = SingletonCursor::new(json!({"n": 1}), Arc::new(JsonAccessor));
        let mut page = PageCursor::new(single, 0, 1);
        assert!(page.move_next().unwrap());
        assert_eq!(
            page.current_accessor().field_value(page.current().unwrap(), "n"),
            Some(FieldValue::Int(1))
        );
        assert!(!page.move_next().unwrap());
    }
}
