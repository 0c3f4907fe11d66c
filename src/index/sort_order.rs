//! Sort-order compatibility checks
//!
//! A planner asks whether walking an index forward (or backward) already
//! produces a requested `ORDER BY`. Fields pinned to a constant by an equality
//! constraint do not affect order and are skipped on both sides.

use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Asc)
    }
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parses `Field`, `+Field` (ascending) or `-Field` (descending).
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if let Some(field) = spec.strip_prefix('-') {
            Self::desc(field)
        } else if let Some(field) = spec.strip_prefix('+') {
            Self::asc(field)
        } else {
            Self::asc(spec)
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => write!(f, "+{}", self.field),
            SortDirection::Desc => write!(f, "-{}", self.field),
        }
    }
}

/// True if forward index order satisfies `sort_order`.
pub fn same_sort_order(
    field_names: &[String],
    ascending: &[bool],
    constant_fields: &[String],
    sort_order: &[SortSpec],
) -> bool {
    matches_sort_order(field_names, ascending, constant_fields, sort_order, false)
}

/// True if backward index order satisfies `sort_order`.
pub fn reverse_sort_order(
    field_names: &[String],
    ascending: &[bool],
    constant_fields: &[String],
    sort_order: &[SortSpec],
) -> bool {
    matches_sort_order(field_names, ascending, constant_fields, sort_order, true)
}

fn matches_sort_order(
    field_names: &[String],
    ascending: &[bool],
    constant_fields: &[String],
    sort_order: &[SortSpec],
    reversed: bool,
) -> bool {
    let is_constant = |name: &str| constant_fields.iter().any(|c| c == name);
    let mut pos = 0;

    for spec in sort_order {
        if is_constant(&spec.field) {
            continue;
        }
        while pos < field_names.len() && is_constant(&field_names[pos]) {
            pos += 1;
        }
        if pos >= field_names.len() || field_names[pos] != spec.field {
            return false;
        }
        let index_ascending = ascending.get(pos).copied().unwrap_or(true);
        if (index_ascending != reversed) != spec.direction.is_ascending() {
            return false;
        }
        pos += 1;
    }
    true
}
