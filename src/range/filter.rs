//! Field predicates
//!
//! `FilterOp` compares a value against a bound using the `FieldValue` order.
//! `FieldFilter` binds an operation to a field name and evaluates it against
//! a record through a `FieldAccessor`. Missing or null values never match.

use std::cmp::Ordering;
use std::fmt;

use crate::cursor::CursorResult;
use crate::index::FieldValue;

use super::accessor::FieldAccessor;

/// Filter operation types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOp {
    /// Equality: field = value
    Eq(FieldValue),
    /// Greater than: field > value
    Gt(FieldValue),
    /// Greater than or equal: field >= value
    Gte(FieldValue),
    /// Less than: field < value
    Lt(FieldValue),
    /// Less than or equal: field <= value
    Lte(FieldValue),
}

impl FilterOp {
    /// Lower bound operation (`>` or `>=`)
    pub fn lower(value: FieldValue, inclusive: bool) -> Self {
        if inclusive {
            FilterOp::Gte(value)
        } else {
            FilterOp::Gt(value)
        }
    }

    /// Upper bound operation (`<` or `<=`)
    pub fn upper(value: FieldValue, inclusive: bool) -> Self {
        if inclusive {
            FilterOp::Lte(value)
        } else {
            FilterOp::Lt(value)
        }
    }

    /// Returns the operand
    pub fn value(&self) -> &FieldValue {
        match self {
            FilterOp::Eq(v) | FilterOp::Gt(v) | FilterOp::Gte(v) | FilterOp::Lt(v) | FilterOp::Lte(v) => v,
        }
    }

    /// Evaluates the operation against `actual` by plain value order.
    pub fn accepts(&self, actual: &FieldValue) -> bool {
        let ord = actual.cmp(self.value());
        match self {
            FilterOp::Eq(_) => ord == Ordering::Equal,
            FilterOp::Gt(_) => ord == Ordering::Greater,
            FilterOp::Gte(_) => ord != Ordering::Less,
            FilterOp::Lt(_) => ord == Ordering::Less,
            FilterOp::Lte(_) => ord != Ordering::Greater,
        }
    }

    /// Returns the operation name
    pub fn op_name(&self) -> &'static str {
        match self {
            FilterOp::Eq(_) => "eq",
            FilterOp::Gt(_) => "gt",
            FilterOp::Gte(_) => "gte",
            FilterOp::Lt(_) => "lt",
            FilterOp::Lte(_) => "lte",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            FilterOp::Eq(_) => "=",
            FilterOp::Gt(_) => ">",
            FilterOp::Gte(_) => ">=",
            FilterOp::Lt(_) => "<",
            FilterOp::Lte(_) => "<=",
        };
        write!(f, "{} {}", symbol, self.value())
    }
}

/// A predicate that can be evaluated against a deserialized record.
pub trait ApplicableFilter<R> {
    /// Returns whether `record` satisfies the predicate.
    fn applies_to(&self, record: &R, accessor: &dyn FieldAccessor<R>) -> CursorResult<bool>;
}

/// A stateless single-field predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// Field name
    pub field: String,
    /// Filter operation
    pub op: FilterOp,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, op: FilterOp) -> Self {
        Self {
            field: field.into(),
            op,
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOp::Eq(value.into()))
    }

    /// Create a greater-than filter
    pub fn gt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOp::Gt(value.into()))
    }

    /// Create a greater-than-or-equal filter
    pub fn gte(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOp::Gte(value.into()))
    }

    /// Create a less-than filter
    pub fn lt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOp::Lt(value.into()))
    }

    /// Create a less-than-or-equal filter
    pub fn lte(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOp::Lte(value.into()))
    }

    /// Evaluates against an already extracted value.
    pub fn matches_value(&self, actual: Option<&FieldValue>) -> bool {
        match actual {
            None | Some(FieldValue::Null) => false,
            Some(v) => self.op.accepts(v),
        }
    }
}

impl<R> ApplicableFilter<R> for FieldFilter {
    fn applies_to(&self, record: &R, accessor: &dyn FieldAccessor<R>) -> CursorResult<bool> {
        let actual = accessor.field_value(record, &self.field);
        Ok(self.matches_value(actual.as_ref()))
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::JsonAccessor;
    use serde_json::json;

    fn applies(filter: &FieldFilter, doc: &serde_json::Value) -> bool {
        filter.applies_to(doc, &JsonAccessor).unwrap()
    }

    #[test]
    fn test_equality_match() {
        let doc = json!({"name": "Alice", "age": 30});

        assert!(applies(&FieldFilter::eq("name", "Alice"), &doc));
        assert!(!applies(&FieldFilter::eq("name", "Bob"), &doc));
    }

    #[test]
    fn test_no_type_coercion() {
        let doc = json!({"value": 123});

        assert!(!applies(&FieldFilter::eq("value", "123"), &doc));
        assert!(applies(&FieldFilter::eq("value", 123), &doc));
    }

    #[test]
    fn test_range_filters() {
        let doc = json!({"age": 25});

        assert!(applies(&FieldFilter::gte("age", 18), &doc));
        assert!(applies(&FieldFilter::lte("age", 30), &doc));
        assert!(!applies(&FieldFilter::gt("age", 25), &doc));
        assert!(!applies(&FieldFilter::lt("age", 25), &doc));
    }

    #[test]
    fn test_missing_field_no_match() {
        let doc = json!({"name": "Alice"});
        assert!(!applies(&FieldFilter::eq("age", 30), &doc));
    }

    #[test]
    fn test_null_value_no_match() {
        let doc = json!({"name": null});
        assert!(!applies(&FieldFilter::lte("name", "Zed"), &doc));
    }

    #[test]
    fn test_accepts_uses_value_order() {
        assert!(FilterOp::Gte(FieldValue::Int(3)).accepts(&FieldValue::Int(3)));
        assert!(!FilterOp::Gt(FieldValue::Int(3)).accepts(&FieldValue::Int(3)));
        assert!(FilterOp::Lt(FieldValue::Int(3)).accepts(&FieldValue::Null));
        assert!(FilterOp::lower(FieldValue::Int(1), false).accepts(&FieldValue::Int(2)));
        assert!(!FilterOp::upper(FieldValue::Int(1), false).accepts(&FieldValue::Int(1)));
    }
}
