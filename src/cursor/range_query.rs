//! Composite range scans over a seekable index
//!
//! `RangeQueryCursor` enumerates, in index order, exactly the records that
//! satisfy one `RangeInfo` per leading index field plus any additional
//! filters. It seeks into the index instead of scanning, and narrows a working
//! copy of the ranges (`current_limits`) from the values it observes so that
//! later seeks skip ranges that cannot match.
//!
//! # Direction
//!
//! A field *advances upward* when its declared direction is ascending and the
//! scan runs forward, or when it is descending and the scan runs backward.
//! Its start bound is Min when advancing upward and Max otherwise; the end
//! bound is the other one. Forward and backward scans share one algorithm
//! parameterized by that flag.
//!
//! # Scan loop
//!
//! 1. Seek: the seek key is the contiguous prefix of points and start bounds.
//!    Start filters come from start bounds, end filters from end bounds and
//!    points.
//! 2. Drain: each record is classified as passing, or failing first at field
//!    `j`, either before its range or after it.
//! 3. Tighten: passing records raise start bounds of leading fields; failing
//!    records pin fields `0..j` to their own values. A changed field resets
//!    every later field to its original range.
//! 4. Decide: yield, keep draining, carry past an exhausted prefix, or reseek
//!    when the tightened seek key lies strictly after the previous one.
//!
//! Callers hold the index borrow (or an `IndexLease`) for the cursor's
//! lifetime; the index cannot change underneath a scan.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::index::{FieldValue, SearchParam, SeekIndex, SortSpec, ValueStep};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry, Severity};
use crate::range::{ApplicableFilter, FieldAccessor, FilterOp, RangeBound, RangeInfo};

use super::errors::{CursorError, CursorResult};
use super::traits::{Cursor, ObjectId};

/// Enumeration direction of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    Forward,
    Backward,
}

impl ScanDirection {
    pub fn is_backward(self) -> bool {
        matches!(self, ScanDirection::Backward)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScanDirection::Forward => "forward",
            ScanDirection::Backward => "backward",
        }
    }
}

impl fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counters for one cursor, cumulative across resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeScanStats {
    /// Seeks issued against the index
    pub seeks: u64,
    /// Entries read from sub-cursors
    pub records_examined: u64,
    /// Records yielded to the caller
    pub records_yielded: u64,
    /// Working bounds tightened
    pub bounds_tightened: u64,
    /// Scans that ran to exhaustion
    pub exhaustions: u64,
}

/// A start or end filter derived from the working limits at seek time.
#[derive(Debug, Clone)]
struct RangeFilter {
    field: usize,
    op: FilterOp,
    upward: bool,
    is_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// The value precedes the failing bound in enumeration order
    Before,
    /// The value lies past the failing bound
    After,
}

#[derive(Debug, Clone, Copy)]
struct RangeFailure {
    field: usize,
    side: Side,
}

struct SeekPlan {
    key: Vec<SearchParam>,
    start_filters: Vec<RangeFilter>,
    end_filters: Vec<RangeFilter>,
}

enum Step {
    Exhausted,
    Skipped,
    Record {
        values: Vec<FieldValue>,
        filters_ok: bool,
    },
}

/// Compares in enumeration order for a field advancing `upward`.
fn enum_cmp(a: &FieldValue, b: &FieldValue, upward: bool) -> Ordering {
    if upward {
        a.cmp(b)
    } else {
        b.cmp(a)
    }
}

/// Composite range cursor over a `SeekIndex`.
pub struct RangeQueryCursor<'a, I: SeekIndex + ?Sized> {
    index: &'a I,
    ranges: Vec<RangeInfo>,
    current_limits: Vec<RangeInfo>,
    filters: Vec<Box<dyn ApplicableFilter<I::Record> + 'a>>,
    current_range: Option<Box<dyn Cursor<I::Record> + 'a>>,
    start_filters: Vec<RangeFilter>,
    end_filters: Vec<RangeFilter>,
    limits_updated_at: usize,
    last_seek_key: Option<Vec<FieldValue>>,
    direction: Option<ScanDirection>,
    exhausted: bool,
    stats: RangeScanStats,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<'a, I: SeekIndex + ?Sized> RangeQueryCursor<'a, I> {
    /// Creates a cursor over `index` constrained by `ranges`.
    ///
    /// `ranges[i]` must name the index's `i`-th field. Fewer ranges than index
    /// fields leave the trailing fields unconstrained; no ranges at all gives a
    /// full scan filtered only by additional filters.
    pub fn new(index: &'a I, ranges: Vec<RangeInfo>) -> CursorResult<Self> {
        let fields = index.field_names();
        if ranges.len() > fields.len() {
            return Err(CursorError::invalid_range(format!(
                "{} ranges for an index of {} fields",
                ranges.len(),
                fields.len()
            )));
        }
        for (range, field) in ranges.iter().zip(fields) {
            if range.field_name() != field {
                return Err(CursorError::invalid_range(format!(
                    "range on '{}' where index field '{}' was expected",
                    range.field_name(),
                    field
                )));
            }
        }

        Ok(Self {
            index,
            current_limits: ranges.clone(),
            ranges,
            filters: Vec::new(),
            current_range: None,
            start_filters: Vec::new(),
            end_filters: Vec::new(),
            limits_updated_at: 0,
            last_seek_key: None,
            direction: None,
            exhausted: false,
            stats: RangeScanStats::default(),
            metrics: None,
        })
    }

    /// Adds a non-indexed filter every yielded record must satisfy.
    pub fn with_filter(mut self, filter: impl ApplicableFilter<I::Record> + 'a) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Adds several boxed filters.
    pub fn with_filters(mut self, filters: Vec<Box<dyn ApplicableFilter<I::Record> + 'a>>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Reports scan counters into a shared registry as well.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn stats(&self) -> RangeScanStats {
        self.stats
    }

    /// The ranges supplied at construction. Never mutated.
    pub fn ranges(&self) -> &[RangeInfo] {
        &self.ranges
    }

    /// The working copy narrowed during the current scan.
    pub fn current_limits(&self) -> &[RangeInfo] {
        &self.current_limits
    }

    pub fn direction(&self) -> Option<ScanDirection> {
        self.direction
    }

    /// Whether a forward scan already satisfies `sort_order`.
    pub fn same_sort_order(&self, constant_fields: &[String], sort_order: &[SortSpec]) -> bool {
        self.index.same_sort_order(constant_fields, sort_order)
    }

    /// Whether a backward scan already satisfies `sort_order`.
    pub fn reverse_sort_order(&self, constant_fields: &[String], sort_order: &[SortSpec]) -> bool {
        self.index.reverse_sort_order(constant_fields, sort_order)
    }

    fn upward(&self, field: usize, direction: ScanDirection) -> bool {
        let ascending = self.index.ascending().get(field).copied().unwrap_or(true);
        ascending != direction.is_backward()
    }

    fn physical_forward(&self, direction: ScanDirection) -> bool {
        self.upward(0, direction)
    }

    fn check_direction(&mut self, direction: ScanDirection) -> CursorResult<()> {
        match self.direction {
            Some(current) if current != direction => Err(CursorError::direction_changed()),
            _ => {
                self.direction = Some(direction);
                Ok(())
            }
        }
    }

    /// Derives the seek key and range filters from the working limits.
    ///
    /// Returns `None` when some field admits no value at all.
    fn plan_seek(&self, direction: ScanDirection) -> Option<SeekPlan> {
        if self.current_limits.iter().any(RangeInfo::is_empty) {
            return None;
        }

        let mut plan = SeekPlan {
            key: Vec::new(),
            start_filters: Vec::new(),
            end_filters: Vec::new(),
        };
        let mut open = true;

        for (i, limit) in self.current_limits.iter().enumerate() {
            let upward = self.upward(i, direction);
            let field = limit.field_name();

            if let Some(point) = limit.point_value() {
                if open {
                    plan.key.push(SearchParam::new(field, point.clone()));
                }
                plan.end_filters.push(RangeFilter {
                    field: i,
                    op: FilterOp::Eq(point.clone()),
                    upward,
                    is_start: false,
                });
                continue;
            }

            match limit.start_bound(upward) {
                Some(bound) => {
                    let seed = if bound.inclusive {
                        bound.value.clone()
                    } else {
                        match bound.value.step(upward) {
                            ValueStep::Value(next) => next,
                            ValueStep::Exhausted => return None,
                            ValueStep::Inexact => bound.value.clone(),
                        }
                    };
                    if open {
                        plan.key.push(SearchParam::new(field, seed));
                    }
                    plan.start_filters.push(RangeFilter {
                        field: i,
                        op: start_op(bound, upward),
                        upward,
                        is_start: true,
                    });
                }
                None => open = false,
            }

            if let Some(bound) = limit.end_bound(upward) {
                plan.end_filters.push(RangeFilter {
                    field: i,
                    op: end_op(bound, upward),
                    upward,
                    is_start: false,
                });
            }
        }

        Some(plan)
    }

    /// Positions a fresh sub-cursor. Returns false when nothing can match.
    fn seek(&mut self, direction: ScanDirection) -> CursorResult<bool> {
        let plan = match self.plan_seek(direction) {
            Some(plan) => plan,
            None => return Ok(false),
        };

        let index: &'a I = self.index;
        let cursor = if self.physical_forward(direction) {
            index.find_first_greater_or_equal_to(&plan.key)?
        } else {
            index.find_last_lesser_or_equal_to(&plan.key)?
        };

        if Logger::enabled(Severity::Trace) {
            let key = plan
                .key
                .iter()
                .map(|p| format!("{}={}", p.field, p.value))
                .collect::<Vec<_>>()
                .join(",");
            let seeks = (self.stats.seeks + 1).to_string();
            log_event_with_fields(
                Event::RangeSeek,
                &[
                    ("direction", direction.as_str()),
                    ("key", key.as_str()),
                    ("seek", seeks.as_str()),
                ],
            );
        }

        self.current_range = Some(cursor);
        self.start_filters = plan.start_filters;
        self.end_filters = plan.end_filters;
        self.last_seek_key = Some(plan.key.into_iter().map(|p| p.value).collect());
        self.limits_updated_at = self.ranges.len();
        self.stats.seeks += 1;
        if let Some(metrics) = &self.metrics {
            metrics.increment_seeks();
        }
        Ok(true)
    }

    /// Steps the sub-cursor and extracts what the decision logic needs.
    fn step_sub_cursor(&mut self, physical_forward: bool) -> CursorResult<Step> {
        let cursor = match self.current_range.as_mut() {
            Some(cursor) => cursor,
            None => return Ok(Step::Exhausted),
        };
        let moved = if physical_forward {
            cursor.move_next()?
        } else {
            cursor.move_previous()?
        };
        if !moved {
            return Ok(Step::Exhausted);
        }

        self.stats.records_examined += 1;
        if let Some(metrics) = &self.metrics {
            metrics.increment_records_examined();
        }

        if !cursor.current_type_compatible() {
            return Ok(Step::Skipped);
        }
        let record = match cursor.current() {
            Some(record) => record,
            None => return Ok(Step::Skipped),
        };
        let accessor = cursor.current_accessor();

        let values = self
            .ranges
            .iter()
            .map(|r| {
                accessor
                    .field_value(record, r.field_name())
                    .unwrap_or(FieldValue::Null)
            })
            .collect();

        let mut filters_ok = true;
        for filter in &self.filters {
            if !filter.applies_to(record, accessor)? {
                filters_ok = false;
                break;
            }
        }

        Ok(Step::Record { values, filters_ok })
    }

    /// Finds the first range filter the record fails, by field position.
    fn first_failure(&self, values: &[FieldValue]) -> Option<RangeFailure> {
        let failed = |f: &&RangeFilter| !f.op.accepts(&values[f.field]);

        let start = self.start_filters.iter().find(failed);
        let limit = start.map_or(values.len(), |f| f.field);
        let end = self
            .end_filters
            .iter()
            .filter(|f| f.field < limit)
            .find(failed);

        end.or(start).map(|f| {
            let side = match enum_cmp(&values[f.field], f.op.value(), f.upward) {
                Ordering::Less => Side::Before,
                Ordering::Greater => Side::After,
                Ordering::Equal if f.is_start => Side::Before,
                Ordering::Equal => Side::After,
            };
            RangeFailure {
                field: f.field,
                side,
            }
        })
    }

    fn restore_from(&mut self, first: usize) {
        for k in first..self.ranges.len() {
            self.ranges[k].copy_to(&mut self.current_limits[k]);
        }
    }

    fn note_tightened(&mut self, field: usize) {
        self.stats.bounds_tightened += 1;
        if let Some(metrics) = &self.metrics {
            metrics.add_bounds_tightened(1);
        }
        if Logger::enabled(Severity::Trace) {
            let bound = self.current_limits[field].to_string();
            log_event_with_fields(Event::BoundTightened, &[("bound", bound.as_str())]);
        }
    }

    /// Narrows working limits from an examined record.
    ///
    /// Without a failure, start bounds of fields below `limits_updated_at`
    /// move up to the record's values until one changes. With a failure at
    /// `j`, fields `0..j` are forced onto the record's values; an equal value
    /// still counts as a change so later fields return to their originals.
    fn tighten(&mut self, values: &[FieldValue], failure: Option<RangeFailure>, direction: ScanDirection) {
        match failure {
            None => {
                let mut i = 0;
                while i < self.limits_updated_at.min(values.len()) {
                    let upward = self.upward(i, direction);
                    if self.current_limits[i].set_start(&values[i], upward, false) {
                        self.note_tightened(i);
                        self.restore_from(i + 1);
                        self.limits_updated_at = i + 1;
                    }
                    i += 1;
                }
            }
            Some(failure) => {
                let mut last_changed = None;
                for i in 0..failure.field {
                    let upward = self.upward(i, direction);
                    if self.current_limits[i].set_start(&values[i], upward, true) {
                        self.note_tightened(i);
                        self.restore_from(i + 1);
                        last_changed = Some(i);
                    }
                }
                if let Some(i) = last_changed {
                    self.limits_updated_at = i + 1;
                }
            }
        }
    }

    /// Whether field `k` has a value after `value` inside its end bound.
    fn can_advance(&self, k: usize, value: &FieldValue, upward: bool) -> bool {
        let limit = &self.current_limits[k];
        if limit.is_point() {
            return false;
        }
        let next = match value.step(upward) {
            ValueStep::Value(next) => next,
            ValueStep::Exhausted => return false,
            ValueStep::Inexact => return true,
        };
        match limit.end_bound(upward) {
            None => true,
            Some(end) => match enum_cmp(&next, &end.value, upward) {
                Ordering::Less => true,
                Ordering::Equal => end.inclusive,
                Ordering::Greater => false,
            },
        }
    }

    /// Moves past a prefix whose remaining entries all lie after field `j`'s range.
    ///
    /// Returns false when no more significant field can advance.
    fn carry(&mut self, j: usize, values: &[FieldValue], direction: ScanDirection) -> bool {
        for k in (0..j).rev() {
            let upward = self.upward(k, direction);
            if self.can_advance(k, &values[k], upward) {
                self.current_limits[k].skip_start(&values[k], upward);
                self.note_tightened(k);
                self.restore_from(k + 1);
                self.limits_updated_at = k + 1;
                return true;
            }
        }
        false
    }

    /// Whether the seek key of the working limits lies strictly after the last one.
    ///
    /// A plan that can no longer match counts as advanced; the reseek then
    /// reports exhaustion.
    fn seek_key_advanced(&self, direction: ScanDirection) -> bool {
        let plan = match self.plan_seek(direction) {
            Some(plan) => plan,
            None => return true,
        };
        let previous = match &self.last_seek_key {
            Some(previous) => previous,
            None => return true,
        };
        for (i, (new, old)) in plan.key.iter().zip(previous).enumerate() {
            match enum_cmp(&new.value, old, self.upward(i, direction)) {
                Ordering::Greater => return true,
                Ordering::Less => return false,
                Ordering::Equal => {}
            }
        }
        plan.key.len() > previous.len()
    }

    fn finish(&mut self, direction: ScanDirection) -> bool {
        self.exhausted = true;
        self.current_range = None;
        self.stats.exhaustions += 1;
        if let Some(metrics) = &self.metrics {
            metrics.increment_scans_exhausted();
        }
        if Logger::enabled(Severity::Trace) {
            let seeks = self.stats.seeks.to_string();
            let examined = self.stats.records_examined.to_string();
            log_event_with_fields(
                Event::RangeExhausted,
                &[
                    ("direction", direction.as_str()),
                    ("examined", examined.as_str()),
                    ("seeks", seeks.as_str()),
                ],
            );
        }
        false
    }

    fn advance(&mut self, direction: ScanDirection) -> CursorResult<bool> {
        self.check_direction(direction)?;
        if self.exhausted {
            return Ok(false);
        }
        let physical_forward = self.physical_forward(direction);

        loop {
            if self.current_range.is_none() && !self.seek(direction)? {
                return Ok(self.finish(direction));
            }

            let (values, filters_ok) = match self.step_sub_cursor(physical_forward)? {
                Step::Exhausted => return Ok(self.finish(direction)),
                Step::Skipped => continue,
                Step::Record { values, filters_ok } => (values, filters_ok),
            };

            let failure = self.first_failure(&values);
            self.tighten(&values, failure, direction);

            match failure {
                None if filters_ok => {
                    self.stats.records_yielded += 1;
                    if let Some(metrics) = &self.metrics {
                        metrics.increment_records_yielded();
                    }
                    return Ok(true);
                }
                None => {}
                Some(RangeFailure {
                    side: Side::Before, ..
                }) => {
                    if self.seek_key_advanced(direction) {
                        self.current_range = None;
                    }
                }
                Some(RangeFailure {
                    field,
                    side: Side::After,
                }) => {
                    if !self.carry(field, &values, direction) {
                        return Ok(self.finish(direction));
                    }
                    if self.seek_key_advanced(direction) {
                        self.current_range = None;
                    }
                }
            }
        }
    }

    fn reject_keyset(&self) -> CursorError {
        let active = self.ranges.len().to_string();
        log_event_with_fields(Event::KeysetRejected, &[("ranges", active.as_str())]);
        CursorError::keyset_not_supported(format!(
            "keyset resume needs exactly one range, {} active",
            active
        ))
    }

    /// Restarts the scan strictly past `item` on the single range's field.
    fn resume_from(&mut self, item: &I::Record, upward: bool) -> CursorResult<()> {
        if self.ranges.len() != 1 {
            return Err(self.reject_keyset());
        }
        self.reset();

        let value = self
            .index
            .accessor()
            .field_value(item, self.ranges[0].field_name())
            .unwrap_or(FieldValue::Null);

        match self.current_limits[0].point_value().cloned() {
            Some(point) => {
                if enum_cmp(&value, &point, upward) != Ordering::Less {
                    self.exhausted = true;
                }
            }
            None => {
                self.current_limits[0].skip_start(&value, upward);
            }
        }
        Ok(())
    }
}

fn start_op(bound: &RangeBound, upward: bool) -> FilterOp {
    if upward {
        FilterOp::lower(bound.value.clone(), bound.inclusive)
    } else {
        FilterOp::upper(bound.value.clone(), bound.inclusive)
    }
}

fn end_op(bound: &RangeBound, upward: bool) -> FilterOp {
    if upward {
        FilterOp::upper(bound.value.clone(), bound.inclusive)
    } else {
        FilterOp::lower(bound.value.clone(), bound.inclusive)
    }
}

impl<'a, I: SeekIndex + ?Sized> Cursor<I::Record> for RangeQueryCursor<'a, I> {
    fn current(&self) -> Option<&I::Record> {
        self.current_range.as_ref().and_then(|c| c.current())
    }

    fn current_accessor(&self) -> &dyn FieldAccessor<I::Record> {
        match &self.current_range {
            Some(cursor) => cursor.current_accessor(),
            None => self.index.accessor(),
        }
    }

    fn current_type_compatible(&self) -> bool {
        self.current_range
            .as_ref()
            .map_or(false, |c| c.current_type_compatible())
    }

    fn current_object_id(&self) -> Option<ObjectId> {
        self.current_range.as_ref().and_then(|c| c.current_object_id())
    }

    fn move_next(&mut self) -> CursorResult<bool> {
        self.advance(ScanDirection::Forward)
    }

    fn move_previous(&mut self) -> CursorResult<bool> {
        self.advance(ScanDirection::Backward)
    }

    fn reset(&mut self) {
        self.current_limits = self.ranges.clone();
        self.current_range = None;
        self.start_filters.clear();
        self.end_filters.clear();
        self.limits_updated_at = 0;
        self.last_seek_key = None;
        self.direction = None;
        self.exhausted = false;
    }

    /// Keyset resume for forward scans. Supported with exactly one range.
    fn continue_after(&mut self, item: &I::Record) -> CursorResult<()> {
        let upward = self.upward(0, ScanDirection::Forward);
        self.resume_from(item, upward)
    }

    /// Keyset resume for backward scans. Supported with exactly one range.
    fn continue_before(&mut self, item: &I::Record) -> CursorResult<()> {
        let upward = self.upward(0, ScanDirection::Backward);
        self.resume_from(item, upward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorErrorCode;
    use crate::index::{IndexDefinition, IndexField, MemoryIndex};
    use crate::range::{FieldFilter, JsonAccessor};
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn people() -> MemoryIndex<Value> {
        let def = IndexDefinition::new(vec![IndexField::asc("Country"), IndexField::desc("Age")]);
        let mut idx = MemoryIndex::new(def, Arc::new(JsonAccessor)).unwrap();
        let rows = [
            ("NO", 30),
            ("SE", 10),
            ("SE", 18),
            ("SE", 40),
            ("SE", 65),
            ("SE", 70),
            ("US", 25),
        ];
        for (n, (country, age)) in rows.iter().enumerate() {
            idx.insert(
                Uuid::from_u128(n as u128 + 1),
                json!({"Country": country, "Age": age}),
            )
            .unwrap();
        }
        idx
    }

    fn collect<I: SeekIndex<Record = Value> + ?Sized>(
        cursor: &mut RangeQueryCursor<'_, I>,
        direction: ScanDirection,
    ) -> Vec<i64> {
        let mut out = Vec::new();
        loop {
            let moved = match direction {
                ScanDirection::Forward => cursor.move_next().unwrap(),
                ScanDirection::Backward => cursor.move_previous().unwrap(),
            };
            if !moved {
                return out;
            }
            out.push(cursor.current().unwrap()["Age"].as_i64().unwrap());
        }
    }

    fn se_working_age() -> Vec<RangeInfo> {
        vec![
            RangeInfo::point("Country", "SE"),
            RangeInfo::between("Age", 18, true, 65, true),
        ]
    }

    #[test]
    fn test_forward_descending_field_single_seek() {
        let idx = people();
        let mut cursor = RangeQueryCursor::new(&idx, se_working_age()).unwrap();

        assert_eq!(collect(&mut cursor, ScanDirection::Forward), vec![65, 40, 18]);
        assert_eq!(cursor.stats().seeks, 1);
        assert_eq!(cursor.stats().records_yielded, 3);
    }

    #[test]
    fn test_backward_mirrors_forward() {
        let idx = people();
        let mut cursor = RangeQueryCursor::new(&idx, se_working_age()).unwrap();

        assert_eq!(collect(&mut cursor, ScanDirection::Backward), vec![18, 40, 65]);
        assert_eq!(cursor.stats().seeks, 1);
    }

    #[test]
    fn test_exhausted_cursor_stays_exhausted() {
        let idx = people();
        let mut cursor = RangeQueryCursor::new(&idx, se_working_age()).unwrap();
        collect(&mut cursor, ScanDirection::Forward);
        assert!(!cursor.move_next().unwrap());
        assert!(cursor.current().is_none());
    }

    #[test]
    fn test_direction_change_requires_reset() {
        let idx = people();
        let mut cursor = RangeQueryCursor::new(&idx, se_working_age()).unwrap();
        assert!(cursor.move_next().unwrap());

        let err = cursor.move_previous().unwrap_err();
        assert_eq!(err.code(), CursorErrorCode::DirectionChanged);

        cursor.reset();
        assert_eq!(collect(&mut cursor, ScanDirection::Backward), vec![18, 40, 65]);
    }

    #[test]
    fn test_reset_restores_limits_and_keeps_stats() {
        let idx = people();
        let mut cursor = RangeQueryCursor::new(&idx, se_working_age()).unwrap();
        collect(&mut cursor, ScanDirection::Forward);
        assert_ne!(cursor.current_limits(), cursor.ranges());

        cursor.reset();
        assert_eq!(cursor.current_limits(), cursor.ranges());
        assert_eq!(cursor.direction(), None);
        assert_eq!(collect(&mut cursor, ScanDirection::Forward), vec![65, 40, 18]);
        assert_eq!(cursor.stats().seeks, 2);
    }

    #[test]
    fn test_no_ranges_scans_everything() {
        let idx = people();
        let mut cursor = RangeQueryCursor::new(&idx, vec![]).unwrap();
        assert_eq!(
            collect(&mut cursor, ScanDirection::Forward),
            vec![30, 70, 65, 40, 18, 10, 25]
        );
    }

    #[test]
    fn test_additional_filter_applies() {
        let idx = people();
        let mut cursor = RangeQueryCursor::new(&idx, vec![RangeInfo::point("Country", "SE")])
            .unwrap()
            .with_filter(FieldFilter::lt("Age", 50));
        assert_eq!(collect(&mut cursor, ScanDirection::Forward), vec![40, 18, 10]);
    }

    #[test]
    fn test_empty_range_yields_nothing_without_seeking() {
        let idx = people();
        let mut cursor =
            RangeQueryCursor::new(&idx, vec![RangeInfo::between("Country", "US", true, "NO", true)]).unwrap();
        assert!(!cursor.move_next().unwrap());
        assert_eq!(cursor.stats().seeks, 0);
    }

    #[test]
    fn test_exclusive_bound_below_null_ends_scan() {
        let idx = people();
        let ranges = vec![
            RangeInfo::point("Country", "SE"),
            RangeInfo::unbounded("Age").with_max(FieldValue::Null, false),
        ];
        let mut cursor = RangeQueryCursor::new(&idx, ranges).unwrap();
        assert!(!cursor.move_next().unwrap());
        assert_eq!(cursor.stats().seeks, 0);
    }

    #[test]
    fn test_ranges_must_follow_index_fields() {
        let idx = people();
        let err = RangeQueryCursor::new(&idx, vec![RangeInfo::point("Age", 3)])
            .err()
            .unwrap();
        assert_eq!(err.code(), CursorErrorCode::InvalidRange);

        let too_many = vec![
            RangeInfo::unbounded("Country"),
            RangeInfo::unbounded("Age"),
            RangeInfo::unbounded("Name"),
        ];
        assert!(RangeQueryCursor::new(&idx, too_many).is_err());
    }

    #[test]
    fn test_keyset_rejected_for_multiple_ranges() {
        let idx = people();
        let mut cursor = RangeQueryCursor::new(&idx, se_working_age()).unwrap();
        let item = json!({"Country": "SE", "Age": 40});

        let err = cursor.continue_after(&item).unwrap_err();
        assert_eq!(err.code(), CursorErrorCode::KeysetNotSupported);
        let err = cursor.continue_before(&item).unwrap_err();
        assert_eq!(err.code(), CursorErrorCode::KeysetNotSupported);
    }

    #[test]
    fn test_keyset_resume_single_range() {
        let def = IndexDefinition::new(vec![IndexField::asc("Age")]);
        let mut idx = MemoryIndex::new(def, Arc::new(JsonAccessor)).unwrap();
        for (n, age) in [5, 10, 15, 20, 25].iter().enumerate() {
            idx.insert(Uuid::from_u128(n as u128), json!({ "Age": age })).unwrap();
        }

        let ranges = vec![RangeInfo::between("Age", 5, true, 25, false)];
        let mut cursor = RangeQueryCursor::new(&idx, ranges).unwrap();
        assert!(cursor.move_next().unwrap());
        assert!(cursor.move_next().unwrap());
        let bookmark = cursor.current().unwrap().clone();

        cursor.continue_after(&bookmark).unwrap();
        assert_eq!(collect(&mut cursor, ScanDirection::Forward), vec![15, 20]);

        cursor.continue_before(&bookmark).unwrap();
        assert_eq!(collect(&mut cursor, ScanDirection::Backward), vec![5]);
    }

    #[test]
    fn test_sort_order_delegates_to_index() {
        let idx = people();
        let cursor = RangeQueryCursor::new(&idx, se_working_age()).unwrap();
        let constant = vec!["Country".to_string()];

        assert!(cursor.same_sort_order(&constant, &[SortSpec::desc("Age")]));
        assert!(cursor.reverse_sort_order(&constant, &[SortSpec::asc("Age")]));
        assert!(!cursor.same_sort_order(&[], &[SortSpec::desc("Age")]));
    }
}
