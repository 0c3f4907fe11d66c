//! Field access over record shapes
//!
//! The range engine never inspects records directly; it asks a
//! `FieldAccessor` for the value of a named field.

use std::sync::Arc;

use serde_json::Value;

use uuid::Uuid;

use crate::cursor::ObjectId;
use crate::index::FieldValue;

/// Read-only access to named fields of a record type.
pub trait FieldAccessor<R> {
    /// Returns the value of `field`, or `None` when the record lacks it.
    fn field_value(&self, record: &R, field: &str) -> Option<FieldValue>;

    /// Returns the record's type name, when the shape carries one.
    fn type_name(&self, _record: &R) -> Option<String> {
        None
    }

    /// Returns the object id the record carries, when the shape stores one.
    ///
    /// Lets a copied record still act as a bookmark among equal keys.
    fn object_id(&self, _record: &R) -> Option<ObjectId> {
        None
    }
}

/// Accessor handle shared between an index and the cursors it hands out.
pub type SharedAccessor<R> = Arc<dyn FieldAccessor<R> + Send + Sync>;

/// Accessor for JSON documents.
///
/// Fields are top-level keys; `_type` names the record type and `_id` holds
/// the object id as a UUID string.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAccessor;

impl JsonAccessor {
    /// Key holding the document's type name
    pub const TYPE_FIELD: &'static str = "_type";

    /// Key holding the document's object id
    pub const ID_FIELD: &'static str = "_id";
}

impl FieldAccessor<Value> for JsonAccessor {
    fn field_value(&self, record: &Value, field: &str) -> Option<FieldValue> {
        record.get(field).and_then(FieldValue::from_json)
    }

    fn type_name(&self, record: &Value) -> Option<String> {
        record
            .get(Self::TYPE_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn object_id(&self, record: &Value) -> Option<ObjectId> {
        record
            .get(Self::ID_FIELD)
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_field_value() {
        let doc = json!({"name": "Alice", "age": 30, "tags": ["a"]});

        assert_eq!(
            JsonAccessor.field_value(&doc, "name"),
            Some(FieldValue::from_string("Alice"))
        );
        assert_eq!(JsonAccessor.field_value(&doc, "age"), Some(FieldValue::Int(30)));
        assert_eq!(JsonAccessor.field_value(&doc, "missing"), None);
        assert_eq!(JsonAccessor.field_value(&doc, "tags"), None);
    }

    #[test]
    fn test_json_type_name() {
        let doc = json!({"_type": "Person"});
        assert_eq!(JsonAccessor.type_name(&doc), Some("Person".to_string()));
        assert_eq!(JsonAccessor.type_name(&json!({})), None);
    }

    #[test]
    fn test_json_object_id() {
        let id = Uuid::from_u128(7);
        assert_eq!(JsonAccessor.object_id(&json!({"_id": id.to_string()})), Some(id));
        assert_eq!(JsonAccessor.object_id(&json!({"_id": "not-a-uuid"})), None);
        assert_eq!(JsonAccessor.object_id(&json!({"_id": 7})), None);
    }
}
