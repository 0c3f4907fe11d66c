//! In-memory composite index
//!
//! Entries are kept in a sorted `Vec` in stored order:
//! - the leading field ascends by natural value order
//! - field `i` follows natural order when its declared direction matches the
//!   leading field's, and reversed order otherwise
//! - ties are broken by object id ascending
//!
//! Logical (declared) order is stored order when the leading field is
//! ascending, and its reverse otherwise. Missing fields are indexed as null.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cursor::{Cursor, CursorError, CursorResult, ObjectId};
use crate::range::{FieldAccessor, SharedAccessor};

use super::definition::IndexDefinition;
use super::errors::{IndexError, IndexResult};
use super::key::FieldValue;
use super::seek::{SearchParam, SeekIndex};

struct IndexEntry<R> {
    key: Vec<FieldValue>,
    id: ObjectId,
    record: R,
    compatible: bool,
}

/// Sorted in-memory index over records of type `R`.
pub struct MemoryIndex<R> {
    definition: IndexDefinition,
    field_names: Vec<String>,
    ascending: Vec<bool>,
    accessor: SharedAccessor<R>,
    record_type: Option<String>,
    keys: HashMap<ObjectId, Vec<FieldValue>>,
    entries: Vec<IndexEntry<R>>,
}

impl<R> MemoryIndex<R> {
    /// Creates an empty index after validating the definition.
    pub fn new(definition: IndexDefinition, accessor: SharedAccessor<R>) -> IndexResult<Self> {
        definition.validate()?;
        Ok(Self {
            field_names: definition.field_names(),
            ascending: definition.ascending(),
            definition,
            accessor,
            record_type: None,
            keys: HashMap::new(),
            entries: Vec::new(),
        })
    }

    /// Restricts type compatibility to records whose type name is `record_type`.
    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn definition(&self) -> &IndexDefinition {
        &self.definition
    }

    pub fn record_type(&self) -> Option<&str> {
        self.record_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone of the accessor handle, for cursors that outlive a borrow.
    pub fn accessor_handle(&self) -> SharedAccessor<R> {
        Arc::clone(&self.accessor)
    }

    /// Whether `record` matches the configured record type.
    pub fn is_compatible(&self, record: &R) -> bool {
        match &self.record_type {
            None => true,
            Some(expected) => self.accessor.type_name(record).as_deref() == Some(expected.as_str()),
        }
    }

    /// Adds a record under `id`.
    pub fn insert(&mut self, id: ObjectId, record: R) -> IndexResult<()> {
        if self.keys.contains_key(&id) {
            return Err(IndexError::DuplicateObjectId(id));
        }
        let key = self.key_of(&record);
        let compatible = self.is_compatible(&record);
        let pos = self.slot(&key, id);
        self.keys.insert(id, key.clone());
        self.entries.insert(
            pos,
            IndexEntry {
                key,
                id,
                record,
                compatible,
            },
        );
        Ok(())
    }

    /// Removes the record stored under `id`.
    pub fn remove(&mut self, id: ObjectId) -> Option<R> {
        let pos = self.position_of(id)?;
        self.keys.remove(&id);
        Some(self.entries.remove(pos).record)
    }

    /// Looks up a record by object id.
    pub fn get(&self, id: ObjectId) -> Option<&R> {
        self.position_of(id).map(|pos| &self.entries[pos].record)
    }

    /// Index of the first entry not below `(key, id)` in stored order.
    fn slot(&self, key: &[FieldValue], id: ObjectId) -> usize {
        self.entries
            .partition_point(|e| self.compare_keys(&e.key, key).then(e.id.cmp(&id)) == Ordering::Less)
    }

    fn position_of(&self, id: ObjectId) -> Option<usize> {
        let key = self.keys.get(&id)?;
        let pos = self.slot(key, id);
        self.entries.get(pos).filter(|e| e.id == id).map(|_| pos)
    }

    /// Resolves the object id of `record` stored under `key`.
    ///
    /// Prefers the id the accessor reads from the record. Otherwise the record
    /// must be the stored one itself, searched among entries sharing `key`.
    fn id_of(&self, record: &R, key: &[FieldValue]) -> Option<ObjectId> {
        if let Some(id) = self.accessor.object_id(record) {
            if self.keys.get(&id).map(Vec::as_slice) == Some(key) {
                return Some(id);
            }
        }
        let lo = self
            .entries
            .partition_point(|e| self.compare_keys(&e.key, key) == Ordering::Less);
        let hi = self
            .entries
            .partition_point(|e| self.compare_keys(&e.key, key) != Ordering::Greater);
        self.entries[lo..hi]
            .iter()
            .find(|e| std::ptr::eq(&e.record, record))
            .map(|e| e.id)
    }

    /// All entries in declared order, as a full forward scan would see them.
    pub fn entries_in_logical_order(&self) -> Vec<(ObjectId, &R)> {
        let mut out: Vec<(ObjectId, &R)> = self.entries.iter().map(|e| (e.id, &e.record)).collect();
        if !self.leading_ascending() {
            out.reverse();
        }
        out
    }

    fn leading_ascending(&self) -> bool {
        self.ascending.first().copied().unwrap_or(true)
    }

    fn key_of(&self, record: &R) -> Vec<FieldValue> {
        self.field_names
            .iter()
            .map(|f| self.accessor.field_value(record, f).unwrap_or(FieldValue::Null))
            .collect()
    }

    fn compare_field(&self, i: usize, a: &FieldValue, b: &FieldValue) -> Ordering {
        let ord = a.cmp(b);
        if self.ascending[i] == self.leading_ascending() {
            ord
        } else {
            ord.reverse()
        }
    }

    fn compare_keys(&self, a: &[FieldValue], b: &[FieldValue]) -> Ordering {
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            let ord = self.compare_field(i, x, y);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    fn seek_values(&self, params: &[SearchParam]) -> CursorResult<Vec<FieldValue>> {
        if params.len() > self.field_names.len() {
            return Err(CursorError::invalid_seek(format!(
                "{} search params for an index of {} fields",
                params.len(),
                self.field_names.len()
            )));
        }
        params
            .iter()
            .zip(&self.field_names)
            .map(|(p, name)| {
                if &p.field == name {
                    Ok(p.value.clone())
                } else {
                    Err(CursorError::invalid_seek(format!(
                        "search param '{}' does not match index field '{}'",
                        p.field, name
                    )))
                }
            })
            .collect()
    }

    fn cursor_at(&self, gap: usize) -> MemoryCursor<'_, R> {
        MemoryCursor {
            index: self,
            start: gap,
            position: Position::Gap(gap),
        }
    }
}

impl<R: 'static> SeekIndex for MemoryIndex<R> {
    type Record = R;

    fn field_names(&self) -> &[String] {
        &self.field_names
    }

    fn ascending(&self) -> &[bool] {
        &self.ascending
    }

    fn accessor(&self) -> &dyn FieldAccessor<R> {
        self.accessor.as_ref()
    }

    fn find_first_greater_or_equal_to(
        &self,
        params: &[SearchParam],
    ) -> CursorResult<Box<dyn Cursor<R> + '_>> {
        let values = self.seek_values(params)?;
        let gap = self
            .entries
            .partition_point(|e| self.compare_keys(&e.key, &values) == Ordering::Less);
        Ok(Box::new(self.cursor_at(gap)))
    }

    fn find_last_lesser_or_equal_to(
        &self,
        params: &[SearchParam],
    ) -> CursorResult<Box<dyn Cursor<R> + '_>> {
        let values = self.seek_values(params)?;
        let gap = self
            .entries
            .partition_point(|e| self.compare_keys(&e.key, &values) != Ordering::Greater);
        Ok(Box::new(self.cursor_at(gap)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Between entries `n - 1` and `n`
    Gap(usize),
    /// On entry `n`
    At(usize),
}

/// Cursor over a `MemoryIndex` in stored order.
///
/// `move_next` walks stored order forward, `move_previous` walks it backward.
pub struct MemoryCursor<'a, R> {
    index: &'a MemoryIndex<R>,
    start: usize,
    position: Position,
}

impl<R> MemoryCursor<'_, R> {
    fn entry(&self) -> Option<&IndexEntry<R>> {
        match self.position {
            Position::At(i) => self.index.entries.get(i),
            Position::Gap(_) => None,
        }
    }

    fn locate(&self, item: &R) -> (Vec<FieldValue>, Option<ObjectId>) {
        let key = self.index.key_of(item);
        let id = self.index.id_of(item, &key);
        (key, id)
    }
}

impl<R> Cursor<R> for MemoryCursor<'_, R> {
    fn current(&self) -> Option<&R> {
        self.entry().map(|e| &e.record)
    }

    fn current_accessor(&self) -> &dyn FieldAccessor<R> {
        self.index.accessor.as_ref()
    }

    fn current_type_compatible(&self) -> bool {
        self.entry().map_or(false, |e| e.compatible)
    }

    fn current_object_id(&self) -> Option<ObjectId> {
        self.entry().map(|e| e.id)
    }

    fn move_next(&mut self) -> CursorResult<bool> {
        let len = self.index.entries.len();
        let next = match self.position {
            Position::Gap(g) => g,
            Position::At(i) => i + 1,
        };
        if next < len {
            self.position = Position::At(next);
            Ok(true)
        } else {
            self.position = Position::Gap(len);
            Ok(false)
        }
    }

    fn move_previous(&mut self) -> CursorResult<bool> {
        let prev = match self.position {
            Position::Gap(g) => g.checked_sub(1),
            Position::At(i) => i.checked_sub(1),
        };
        match prev {
            Some(p) => {
                self.position = Position::At(p);
                Ok(true)
            }
            None => {
                self.position = Position::Gap(0);
                Ok(false)
            }
        }
    }

    fn reset(&mut self) {
        self.position = Position::Gap(self.start);
    }

    /// Places the cursor just past `item` in stored order.
    fn continue_after(&mut self, item: &R) -> CursorResult<()> {
        let (key, id) = self.locate(item);
        let gap = self.index.entries.partition_point(|e| {
            let ord = self.index.compare_keys(&e.key, &key);
            match id {
                Some(id) => ord.then(e.id.cmp(&id)) != Ordering::Greater,
                None => ord != Ordering::Greater,
            }
        });
        self.position = Position::Gap(gap);
        Ok(())
    }

    /// Places the cursor just before `item` in stored order.
    fn continue_before(&mut self, item: &R) -> CursorResult<()> {
        let (key, id) = self.locate(item);
        let gap = self.index.entries.partition_point(|e| {
            let ord = self.index.compare_keys(&e.key, &key);
            match id {
                Some(id) => ord.then(e.id.cmp(&id)) == Ordering::Less,
                None => ord == Ordering::Less,
            }
        });
        self.position = Position::Gap(gap);
        Ok(())
    }
}

/// Read guard over a shared index. Cursors borrow from it, so the index
/// cannot be modified while any of them is alive.
pub type IndexLease<'a, R> = RwLockReadGuard<'a, MemoryIndex<R>>;

/// A `MemoryIndex` shared between writers and concurrent readers.
pub struct SharedIndex<R> {
    inner: Arc<RwLock<MemoryIndex<R>>>,
}

impl<R> SharedIndex<R> {
    pub fn new(index: MemoryIndex<R>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Takes a read lease for the duration of a scan.
    pub fn lease(&self) -> IndexLease<'_, R> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes exclusive access for updates.
    pub fn write(&self) -> RwLockWriteGuard<'_, MemoryIndex<R>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> Clone for SharedIndex<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
