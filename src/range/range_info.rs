//! Per-field range descriptors
//!
//! A `RangeInfo` is either a point (`field = value`) or an independent pair of
//! optional lower/upper bounds. Range cursors keep a working copy per field and
//! tighten it while scanning; bounds only ever get tighter, never looser.

use std::cmp::Ordering;
use std::fmt;

use crate::index::FieldValue;

use super::filter::FilterOp;

/// One side of a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBound {
    /// Bound value
    pub value: FieldValue,
    /// Whether the bound value itself is inside the range
    pub inclusive: bool,
}

impl RangeBound {
    pub fn new(value: FieldValue, inclusive: bool) -> Self {
        Self { value, inclusive }
    }

    pub fn inclusive(value: FieldValue) -> Self {
        Self::new(value, true)
    }

    pub fn exclusive(value: FieldValue) -> Self {
        Self::new(value, false)
    }
}

/// Range constraint for a single index field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeInfo {
    field_name: String,
    point: Option<FieldValue>,
    min: Option<RangeBound>,
    max: Option<RangeBound>,
}

impl RangeInfo {
    /// Creates a range that accepts every value of `field_name`.
    pub fn unbounded(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            point: None,
            min: None,
            max: None,
        }
    }

    /// Creates a point range (`field = value`).
    pub fn point(field_name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field_name: field_name.into(),
            point: Some(value.into()),
            min: None,
            max: None,
        }
    }

    /// Creates a range with both bounds, normalized.
    pub fn between(
        field_name: impl Into<String>,
        min: impl Into<FieldValue>,
        min_inclusive: bool,
        max: impl Into<FieldValue>,
        max_inclusive: bool,
    ) -> Self {
        Self::unbounded(field_name)
            .with_min(min, min_inclusive)
            .with_max(max, max_inclusive)
    }

    /// Intersects with a lower bound.
    pub fn with_min(mut self, value: impl Into<FieldValue>, inclusive: bool) -> Self {
        self.restrict(&FilterOp::lower(value.into(), inclusive));
        self
    }

    /// Intersects with an upper bound.
    pub fn with_max(mut self, value: impl Into<FieldValue>, inclusive: bool) -> Self {
        self.restrict(&FilterOp::upper(value.into(), inclusive));
        self
    }

    /// Intersects the range with a filter operation on the same field.
    ///
    /// Contradictory constraints leave an empty range (see `is_empty`).
    pub fn restrict(&mut self, op: &FilterOp) {
        if let Some(p) = self.point.clone() {
            if !op.accepts(&p) {
                self.make_empty(p);
            }
            return;
        }

        match op {
            FilterOp::Eq(v) => {
                if self.contains(v) {
                    self.point = Some(v.clone());
                    self.min = None;
                    self.max = None;
                } else {
                    self.make_empty(v.clone());
                }
            }
            FilterOp::Gt(v) => {
                tighten_lower(&mut self.min, RangeBound::exclusive(v.clone()));
            }
            FilterOp::Gte(v) => {
                tighten_lower(&mut self.min, RangeBound::inclusive(v.clone()));
            }
            FilterOp::Lt(v) => {
                tighten_upper(&mut self.max, RangeBound::exclusive(v.clone()));
            }
            FilterOp::Lte(v) => {
                tighten_upper(&mut self.max, RangeBound::inclusive(v.clone()));
            }
        }
        self.normalize();
    }

    /// Collapses `[v, v]` into a point.
    pub fn normalize(&mut self) {
        if let (Some(min), Some(max)) = (&self.min, &self.max) {
            if min.inclusive && max.inclusive && min.value == max.value {
                self.point = Some(min.value.clone());
                self.min = None;
                self.max = None;
            }
        }
    }

    fn make_empty(&mut self, at: FieldValue) {
        self.point = None;
        self.min = Some(RangeBound::exclusive(at.clone()));
        self.max = Some(RangeBound::exclusive(at));
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn is_point(&self) -> bool {
        self.point.is_some()
    }

    pub fn point_value(&self) -> Option<&FieldValue> {
        self.point.as_ref()
    }

    pub fn has_min(&self) -> bool {
        self.min.is_some()
    }

    pub fn min(&self) -> Option<&FieldValue> {
        self.min.as_ref().map(|b| &b.value)
    }

    pub fn min_inclusive(&self) -> bool {
        self.min.as_ref().map_or(false, |b| b.inclusive)
    }

    pub fn min_bound(&self) -> Option<&RangeBound> {
        self.min.as_ref()
    }

    pub fn has_max(&self) -> bool {
        self.max.is_some()
    }

    pub fn max(&self) -> Option<&FieldValue> {
        self.max.as_ref().map(|b| &b.value)
    }

    pub fn max_inclusive(&self) -> bool {
        self.max.as_ref().map_or(false, |b| b.inclusive)
    }

    pub fn max_bound(&self) -> Option<&RangeBound> {
        self.max.as_ref()
    }

    /// The bound enumeration starts from: Min when values advance upward, else Max.
    pub fn start_bound(&self, upward: bool) -> Option<&RangeBound> {
        if upward {
            self.min.as_ref()
        } else {
            self.max.as_ref()
        }
    }

    /// The bound enumeration stops at: Max when values advance upward, else Min.
    pub fn end_bound(&self, upward: bool) -> Option<&RangeBound> {
        if upward {
            self.max.as_ref()
        } else {
            self.min.as_ref()
        }
    }

    /// Returns true when no value can satisfy the range.
    pub fn is_empty(&self) -> bool {
        if self.point.is_some() {
            return false;
        }
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => match min.value.cmp(&max.value) {
                Ordering::Greater => true,
                Ordering::Equal => !(min.inclusive && max.inclusive),
                Ordering::Less => false,
            },
            _ => false,
        }
    }

    /// Returns true when `value` lies inside the range.
    pub fn contains(&self, value: &FieldValue) -> bool {
        if let Some(p) = &self.point {
            return p == value;
        }
        let above_min = self.min.as_ref().map_or(true, |b| match value.cmp(&b.value) {
            Ordering::Greater => true,
            Ordering::Equal => b.inclusive,
            Ordering::Less => false,
        });
        let below_max = self.max.as_ref().map_or(true, |b| match value.cmp(&b.value) {
            Ordering::Less => true,
            Ordering::Equal => b.inclusive,
            Ordering::Greater => false,
        });
        above_min && below_max
    }

    /// Raises the lower bound to `value` (inclusive).
    ///
    /// The bound is adopted when none exists yet or `value` is strictly larger.
    /// An equal value against an inclusive bound leaves the range untouched but
    /// is still reported as a change when `force_smaller` is set. Returns whether
    /// the bound changed (or was forced). Point ranges never change.
    pub fn set_min(&mut self, value: &FieldValue, force_smaller: bool) -> bool {
        if self.point.is_some() {
            return false;
        }
        match &self.min {
            None => {
                self.min = Some(RangeBound::inclusive(value.clone()));
                true
            }
            Some(current) => match value.cmp(&current.value) {
                Ordering::Greater => {
                    self.min = Some(RangeBound::inclusive(value.clone()));
                    true
                }
                Ordering::Equal => current.inclusive && force_smaller,
                Ordering::Less => false,
            },
        }
    }

    /// Lowers the upper bound to `value` (inclusive). Mirror of `set_min`.
    pub fn set_max(&mut self, value: &FieldValue, force_smaller: bool) -> bool {
        if self.point.is_some() {
            return false;
        }
        match &self.max {
            None => {
                self.max = Some(RangeBound::inclusive(value.clone()));
                true
            }
            Some(current) => match value.cmp(&current.value) {
                Ordering::Less => {
                    self.max = Some(RangeBound::inclusive(value.clone()));
                    true
                }
                Ordering::Equal => current.inclusive && force_smaller,
                Ordering::Greater => false,
            },
        }
    }

    /// Moves the lower bound just past `value` (exclusive). Returns whether it changed.
    pub fn skip_min(&mut self, value: &FieldValue) -> bool {
        if self.point.is_some() {
            return false;
        }
        tighten_lower(&mut self.min, RangeBound::exclusive(value.clone()))
    }

    /// Moves the upper bound just below `value` (exclusive). Returns whether it changed.
    pub fn skip_max(&mut self, value: &FieldValue) -> bool {
        if self.point.is_some() {
            return false;
        }
        tighten_upper(&mut self.max, RangeBound::exclusive(value.clone()))
    }

    /// `set_min` when values advance upward, `set_max` otherwise.
    pub fn set_start(&mut self, value: &FieldValue, upward: bool, force_smaller: bool) -> bool {
        if upward {
            self.set_min(value, force_smaller)
        } else {
            self.set_max(value, force_smaller)
        }
    }

    /// `skip_min` when values advance upward, `skip_max` otherwise.
    pub fn skip_start(&mut self, value: &FieldValue, upward: bool) -> bool {
        if upward {
            self.skip_min(value)
        } else {
            self.skip_max(value)
        }
    }

    /// Overwrites `target` with a copy of this range.
    pub fn copy_to(&self, target: &mut RangeInfo) {
        target.clone_from(self);
    }
}

fn tighten_lower(slot: &mut Option<RangeBound>, candidate: RangeBound) -> bool {
    let tighter = match slot {
        None => true,
        Some(current) => match candidate.value.cmp(&current.value) {
            Ordering::Greater => true,
            Ordering::Equal => current.inclusive && !candidate.inclusive,
            Ordering::Less => false,
        },
    };
    if tighter {
        *slot = Some(candidate);
    }
    tighter
}

fn tighten_upper(slot: &mut Option<RangeBound>, candidate: RangeBound) -> bool {
    let tighter = match slot {
        None => true,
        Some(current) => match candidate.value.cmp(&current.value) {
            Ordering::Less => true,
            Ordering::Equal => current.inclusive && !candidate.inclusive,
            Ordering::Greater => false,
        },
    };
    if tighter {
        *slot = Some(candidate);
    }
    tighter
}

impl fmt::Display for RangeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.point {
            return write!(f, "{} = {}", self.field_name, p);
        }
        let open = match &self.min {
            Some(b) if b.inclusive => format!("[{}", b.value),
            Some(b) => format!("({}", b.value),
            None => "(*".to_string(),
        };
        let close = match &self.max {
            Some(b) if b.inclusive => format!("{}]", b.value),
            Some(b) => format!("{})", b.value),
            None => "*)".to_string(),
        };
        write!(f, "{} in {}, {}", self.field_name, open, close)
    }
}
