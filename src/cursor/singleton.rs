//! One-record cursor for point lookups

use crate::range::{FieldAccessor, SharedAccessor};

use super::errors::CursorResult;
use super::traits::{Cursor, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SingletonState {
    NotStarted,
    Positioned,
    Exhausted,
}

/// Cursor over zero or one record.
///
/// Each move toggles between "positioned on the record" and "exhausted", so a
/// fresh cursor yields `true, false, true, false, ...`. An empty cursor never
/// yields.
pub struct SingletonCursor<R> {
    value: Option<R>,
    accessor: SharedAccessor<R>,
    object_id: Option<ObjectId>,
    compatible: bool,
    state: SingletonState,
}

impl<R> SingletonCursor<R> {
    pub fn new(value: R, accessor: SharedAccessor<R>) -> Self {
        Self {
            value: Some(value),
            accessor,
            object_id: None,
            compatible: true,
            state: SingletonState::NotStarted,
        }
    }

    /// A cursor with nothing to yield, for point lookups that miss.
    pub fn empty(accessor: SharedAccessor<R>) -> Self {
        Self {
            value: None,
            accessor,
            object_id: None,
            compatible: false,
            state: SingletonState::NotStarted,
        }
    }

    pub fn with_object_id(mut self, object_id: ObjectId) -> Self {
        self.object_id = Some(object_id);
        self
    }

    pub fn with_type_compatible(mut self, compatible: bool) -> Self {
        self.compatible = compatible && self.value.is_some();
        self
    }

    fn toggle(&mut self) -> bool {
        if self.value.is_none() {
            return false;
        }
        match self.state {
            SingletonState::NotStarted | SingletonState::Exhausted => {
                self.state = SingletonState::Positioned;
                true
            }
            SingletonState::Positioned => {
                self.state = SingletonState::Exhausted;
                false
            }
        }
    }
}

impl<R> Cursor<R> for SingletonCursor<R> {
    fn current(&self) -> Option<&R> {
        match self.state {
            SingletonState::Positioned => self.value.as_ref(),
            _ => None,
        }
    }

    fn current_accessor(&self) -> &dyn FieldAccessor<R> {
        self.accessor.as_ref()
    }

    fn current_type_compatible(&self) -> bool {
        self.state == SingletonState::Positioned && self.compatible
    }

    fn current_object_id(&self) -> Option<ObjectId> {
        match self.state {
            SingletonState::Positioned => self.object_id,
            _ => None,
        }
    }

    fn move_next(&mut self) -> CursorResult<bool> {
        Ok(self.toggle())
    }

    fn move_previous(&mut self) -> CursorResult<bool> {
        Ok(self.toggle())
    }

    fn reset(&mut self) {
        self.state = SingletonState::NotStarted;
    }

    /// Nothing follows the single record; the next move reports exhaustion.
    fn continue_after(&mut self, _item: &R) -> CursorResult<()> {
        self.state = SingletonState::Positioned;
        Ok(())
    }

    /// Nothing precedes the single record; the next move reports exhaustion.
    fn continue_before(&mut self, _item: &R) -> CursorResult<()> {
        self.state = SingletonState::Positioned;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::JsonAccessor;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use uuid::Uuid;

    fn single() -> SingletonCursor<Value> {
        SingletonCursor::new(json!({"name": "Ada"}), Arc::new(JsonAccessor))
    }

    #[test]
    fn test_move_next_toggles() {
        let mut cursor = single();
        let seen: Vec<bool> = (0..5).map(|_| cursor.move_next().unwrap()).collect();
        assert_eq!(seen, vec![true, false, true, false, true]);
    }

    #[test]
    fn test_current_only_when_positioned() {
        let id = Uuid::from_u128(7);
        let mut cursor = single().with_object_id(id);
        assert!(cursor.current().is_none());

        assert!(cursor.move_previous().unwrap());
        assert_eq!(cursor.current(), Some(&json!({"name": "Ada"})));
        assert_eq!(cursor.current_object_id(), Some(id));
        assert!(cursor.current_type_compatible());

        assert!(!cursor.move_previous().unwrap());
        assert!(cursor.current().is_none());
        assert!(!cursor.current_type_compatible());
    }

    #[test]
    fn test_reset_starts_over() {
        let mut cursor = single();
        assert!(cursor.move_next().unwrap());
        cursor.reset();
        assert!(cursor.move_next().unwrap());
    }

    #[test]
    fn test_continue_after_exhausts() {
        let mut cursor = single();
        let item = json!({"name": "Ada"});
        cursor.continue_after(&item).unwrap();
        assert!(!cursor.move_next().unwrap());
        cursor.continue_before(&item).unwrap();
        assert!(!cursor.move_previous().unwrap());
    }

    #[test]
    fn test_empty_never_yields() {
        let mut cursor: SingletonCursor<Value> = SingletonCursor::empty(Arc::new(JsonAccessor));
        assert!(!cursor.move_next().unwrap());
        assert!(!cursor.move_next().unwrap());
        assert!(cursor.current().is_none());
    }
}
