//! CLI command implementations
//!
//! Commands build an in-memory index from a JSON-lines file, translate
//! `Field=Value` constraints into one range per leading index field plus
//! additional filters, and print matches as JSON lines.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::cursor::{Cursor, CursorResult, ObjectId, PageCursor, RangeQueryCursor, SingletonCursor};
use crate::index::{
    reverse_sort_order, same_sort_order, FieldValue, IndexDefinition, MemoryIndex, SortSpec,
};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::range::{ApplicableFilter, FieldAccessor, FieldFilter, FilterOp, JsonAccessor, RangeInfo};

use super::args::{Command, QueryArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_documents, write_json, write_lines};

/// Key holding a document's object id
pub const ID_FIELD: &str = JsonAccessor::ID_FIELD;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query(args) => write_lines(&query(&args)?),
        Command::Order {
            config,
            sort,
            constant,
        } => write_json(&order(&config, &sort, &constant)?),
    }
}

/// Execute a query and return the matching documents in output order.
pub fn query(args: &QueryArgs) -> CliResult<Vec<Value>> {
    let config = load_config(&args.config)?;
    let index = build_index(&config, read_documents(&args.data)?)?;
    let constraints = parse_constraints(args)?;
    let metrics = Arc::new(MetricsRegistry::new());

    log_event_with_fields(
        Event::QueryStart,
        &[("constraints", constraints.len().to_string().as_str())],
    );

    let mut cursor = open_cursor(&index, &config, args, constraints, &metrics)?;
    let docs = drain(cursor.as_mut())?;

    let stats = metrics.snapshot();
    log_event_with_fields(
        Event::QueryComplete,
        &[
            ("examined", stats.records_examined.to_string().as_str()),
            ("rows", docs.len().to_string().as_str()),
            ("seeks", stats.seeks.to_string().as_str()),
        ],
    );
    Ok(docs)
}

/// Picks the cursor for a query: a point lookup for `--id`, otherwise a range
/// scan, then applies direction and paging.
fn open_cursor<'a>(
    index: &'a MemoryIndex<Value>,
    config: &EngineConfig,
    args: &QueryArgs,
    constraints: Vec<FieldFilter>,
    metrics: &Arc<MetricsRegistry>,
) -> CliResult<Box<dyn Cursor<Value> + 'a>> {
    let cursor: Box<dyn Cursor<Value> + 'a> = match &args.id {
        Some(raw) => {
            let id = Uuid::parse_str(raw)
                .map_err(|e| CliError::input_error(format!("Invalid --id '{}': {}", raw, e)))?;
            Box::new(point_lookup(index, id, &constraints)?)
        }
        None => {
            let (ranges, extra) = plan_ranges(config.index.clone(), constraints);
            let mut scan = RangeQueryCursor::new(index, ranges)?.with_metrics(Arc::clone(metrics));
            for filter in extra {
                scan = scan.with_filter(filter);
            }
            if args.reverse {
                Box::new(Backward(scan))
            } else {
                Box::new(scan)
            }
        }
    };

    if args.offset.is_none() && args.limit.is_none() {
        return Ok(cursor);
    }
    Ok(Box::new(PageCursor::new(
        cursor,
        args.offset.unwrap_or(0),
        args.limit.unwrap_or(usize::MAX),
    )))
}

/// Report whether forward or backward index order satisfies `sort`.
pub fn order(config_path: &Path, sort: &[String], constant: &[String]) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let specs: Vec<SortSpec> = sort.iter().map(|s| SortSpec::parse(s)).collect();
    let fields = config.index.field_names();
    let ascending = config.index.ascending();

    Ok(json!({
        "same": same_sort_order(&fields, &ascending, constant, &specs),
        "reverse": reverse_sort_order(&fields, &ascending, constant, &specs),
    }))
}

fn load_config(path: &Path) -> CliResult<EngineConfig> {
    let config = EngineConfig::load(path)?;
    Logger::set_min_severity(config.severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", path.display().to_string().as_str())],
    );
    Ok(config)
}

/// Builds the index from documents. `_id` supplies the object id when present.
pub fn build_index(config: &EngineConfig, docs: Vec<Value>) -> CliResult<MemoryIndex<Value>> {
    let mut index = MemoryIndex::new(config.index.clone(), Arc::new(JsonAccessor))?;
    if let Some(record_type) = &config.record_type {
        index = index.with_record_type(record_type.clone());
    }

    for doc in docs {
        let id = object_id_of(&doc)?;
        index.insert(id, doc)?;
    }

    log_event_with_fields(
        Event::IndexBuilt,
        &[("documents", index.len().to_string().as_str())],
    );
    Ok(index)
}

fn object_id_of(doc: &Value) -> CliResult<ObjectId> {
    match doc.get(ID_FIELD) {
        None => Ok(Uuid::new_v4()),
        Some(Value::String(s)) => Uuid::parse_str(s)
            .map_err(|e| CliError::input_error(format!("Invalid {} '{}': {}", ID_FIELD, s, e))),
        Some(other) => Err(CliError::input_error(format!(
            "{} must be a UUID string, got {}",
            ID_FIELD, other
        ))),
    }
}

/// Parses a constraint value: JSON when possible, otherwise a plain string.
pub fn parse_value(raw: &str) -> FieldValue {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| FieldValue::from_json(&v))
        .unwrap_or_else(|| FieldValue::from_string(raw))
}

/// Parses `Field=Value` into a filter built by `make`.
pub fn parse_constraint(spec: &str, make: fn(FieldValue) -> FilterOp) -> CliResult<FieldFilter> {
    let (field, raw) = spec
        .split_once('=')
        .ok_or_else(|| CliError::input_error(format!("Constraint '{}' must be Field=Value", spec)))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(CliError::input_error(format!("Constraint '{}' names no field", spec)));
    }
    Ok(FieldFilter::new(field, make(parse_value(raw))))
}

fn parse_constraints(args: &QueryArgs) -> CliResult<Vec<FieldFilter>> {
    let groups: [(&[String], fn(FieldValue) -> FilterOp); 5] = [
        (&args.eq, FilterOp::Eq),
        (&args.gt, FilterOp::Gt),
        (&args.gte, FilterOp::Gte),
        (&args.lt, FilterOp::Lt),
        (&args.lte, FilterOp::Lte),
    ];

    let mut out = Vec::new();
    for (specs, make) in groups {
        for spec in specs {
            out.push(parse_constraint(spec, make)?);
        }
    }
    Ok(out)
}

/// Splits constraints into ranges over the leading index fields and filters
/// on everything else.
///
/// One range is produced per index field up to the last constrained one;
/// unconstrained fields in between stay unbounded. Constrained fields exclude
/// null, matching how filters treat missing values.
pub fn plan_ranges(
    definition: IndexDefinition,
    constraints: Vec<FieldFilter>,
) -> (Vec<RangeInfo>, Vec<FieldFilter>) {
    let mut ranges: Vec<RangeInfo> = definition
        .fields
        .iter()
        .map(|f| RangeInfo::unbounded(f.name.as_str()))
        .collect();
    let mut last_constrained = None;
    let mut extra = Vec::new();

    for constraint in constraints {
        match definition.position(&constraint.field) {
            Some(pos) => {
                ranges[pos].restrict(&FilterOp::Gt(FieldValue::Null));
                ranges[pos].restrict(&constraint.op);
                last_constrained = Some(last_constrained.map_or(pos, |l: usize| l.max(pos)));
            }
            None => extra.push(constraint),
        }
    }

    ranges.truncate(last_constrained.map_or(0, |l| l + 1));
    (ranges, extra)
}

fn point_lookup(
    index: &MemoryIndex<Value>,
    id: ObjectId,
    constraints: &[FieldFilter],
) -> CliResult<SingletonCursor<Value>> {
    let accessor = index.accessor_handle();
    let record = match index.get(id) {
        Some(record) => record,
        None => return Ok(SingletonCursor::empty(accessor)),
    };

    for constraint in constraints {
        if !constraint.applies_to(record, accessor.as_ref())? {
            return Ok(SingletonCursor::empty(accessor));
        }
    }

    Ok(SingletonCursor::new(record.clone(), Arc::clone(&accessor))
        .with_object_id(id)
        .with_type_compatible(index.is_compatible(record)))
}

fn drain(cursor: &mut dyn Cursor<Value>) -> CliResult<Vec<Value>> {
    let mut docs = Vec::new();
    while cursor.move_next()? {
        if !cursor.current_type_compatible() {
            continue;
        }
        if let Some(doc) = cursor.current() {
            docs.push(doc.clone());
        }
    }
    Ok(docs)
}

/// Presents a cursor's backward enumeration as `move_next`, so forward-only
/// decorators page through it in reverse order.
struct Backward<C>(C);

impl<C: Cursor<Value>> Cursor<Value> for Backward<C> {
    fn current(&self) -> Option<&Value> {
        self.0.current()
    }

    fn current_accessor(&self) -> &dyn FieldAccessor<Value> {
        self.0.current_accessor()
    }

    fn current_type_compatible(&self) -> bool {
        self.0.current_type_compatible()
    }

    fn current_object_id(&self) -> Option<ObjectId> {
        self.0.current_object_id()
    }

    fn move_next(&mut self) -> CursorResult<bool> {
        self.0.move_previous()
    }

    fn move_previous(&mut self) -> CursorResult<bool> {
        self.0.move_next()
    }

    fn reset(&mut self) {
        self.0.reset()
    }

    fn continue_after(&mut self, item: &Value) -> CursorResult<()> {
        self.0.continue_before(item)
    }

    fn continue_before(&mut self, item: &Value) -> CursorResult<()> {
        self.0.continue_after(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexField;

    fn definition() -> IndexDefinition {
        IndexDefinition::new(vec![IndexField::asc("Country"), IndexField::desc("Age")])
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), FieldValue::Int(42));
        assert_eq!(parse_value("true"), FieldValue::Bool(true));
        assert_eq!(parse_value("\"SE\""), FieldValue::from_string("SE"));
        assert_eq!(parse_value("SE"), FieldValue::from_string("SE"));
        assert_eq!(parse_value("[1]"), FieldValue::from_string("[1]"));
    }

    #[test]
    fn test_parse_constraint() {
        let f = parse_constraint("Age=18", FilterOp::Gte).unwrap();
        assert_eq!(f, FieldFilter::gte("Age", 18));
        assert!(parse_constraint("Age", FilterOp::Eq).is_err());
        assert!(parse_constraint("=3", FilterOp::Eq).is_err());
    }

    #[test]
    fn test_plan_ranges_prefix_and_filters() {
        let constraints = vec![
            FieldFilter::gte("Age", 18),
            FieldFilter::lte("Age", 65),
            FieldFilter::eq("Name", "Ada"),
        ];
        let (ranges, extra) = plan_ranges(definition(), constraints);

        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0], RangeInfo::unbounded("Country"));
        assert_eq!(ranges[1].min(), Some(&FieldValue::Int(18)));
        assert_eq!(ranges[1].max(), Some(&FieldValue::Int(65)));
        assert_eq!(extra.len(), 1);
    }

    #[test]
    fn test_plan_ranges_point_and_empty() {
        let (ranges, extra) = plan_ranges(definition(), vec![FieldFilter::eq("Country", "SE")]);
        assert_eq!(ranges, vec![RangeInfo::point("Country", "SE")]);
        assert!(extra.is_empty());

        let (ranges, _) = plan_ranges(definition(), vec![]);
        assert!(ranges.is_empty());
    }

    #[test]
    fn test_plan_ranges_upper_bound_excludes_null() {
        let (ranges, _) = plan_ranges(definition(), vec![FieldFilter::lt("Country", "M")]);
        assert!(!ranges[0].contains(&FieldValue::Null));
        assert!(ranges[0].contains(&FieldValue::from_string("DK")));
    }

    #[test]
    fn test_mixed_int_float_range() {
        let definition = IndexDefinition::new(vec![IndexField::asc("Age")]);
        let mut index = MemoryIndex::new(definition.clone(), Arc::new(JsonAccessor)).unwrap();
        for (n, age) in [json!(1), json!(2), json!(3), json!(2.5)].into_iter().enumerate() {
            index.insert(Uuid::from_u128(n as u128 + 1), json!({ "Age": age })).unwrap();
        }

        let ages = |op: FilterOp| {
            let (ranges, _) = plan_ranges(definition.clone(), vec![FieldFilter::new("Age", op)]);
            let mut cursor = RangeQueryCursor::new(&index, ranges).unwrap();
            drain(&mut cursor).unwrap().into_iter().map(|d| d["Age"].clone()).collect::<Vec<_>>()
        };

        assert_eq!(ages(FilterOp::Gt(parse_value("1.5"))), vec![json!(2), json!(2.5), json!(3)]);
        assert_eq!(ages(FilterOp::Lte(parse_value("2.5"))), vec![json!(1), json!(2), json!(2.5)]);
        assert_eq!(ages(FilterOp::Gt(parse_value("2"))), vec![json!(2.5), json!(3)]);
    }

    #[test]
    fn test_object_id_of() {
        let id = Uuid::from_u128(9);
        assert_eq!(object_id_of(&json!({"_id": id.to_string()})).unwrap(), id);
        assert!(object_id_of(&json!({"_id": 5})).is_err());
        assert!(object_id_of(&json!({"_id": "nope"})).is_err());
        assert!(object_id_of(&json!({})).is_ok());
    }
}
