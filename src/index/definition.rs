//! Composite index definitions

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::errors::{IndexError, IndexResult};

/// One field of a composite index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    /// Field name
    pub name: String,
    /// Stored direction (default ascending)
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

impl IndexField {
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ascending: true,
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ascending: false,
        }
    }
}

/// Ordered list of fields making up a composite index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub fields: Vec<IndexField>,
}

impl IndexDefinition {
    pub fn new(fields: Vec<IndexField>) -> Self {
        Self { fields }
    }

    /// Checks for an empty field list and duplicate names.
    pub fn validate(&self) -> IndexResult<()> {
        if self.fields.is_empty() {
            return Err(IndexError::NoFields);
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(IndexError::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn ascending(&self) -> Vec<bool> {
        self.fields.iter().map(|f| f.ascending).collect()
    }

    /// Position of `name` in the index, if indexed.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let def = IndexDefinition::new(vec![IndexField::asc("Country"), IndexField::desc("Age")]);
        assert!(def.validate().is_ok());
        assert_eq!(def.ascending(), vec![true, false]);
        assert_eq!(def.position("Age"), Some(1));

        assert_eq!(IndexDefinition::new(vec![]).validate(), Err(IndexError::NoFields));

        let dup = IndexDefinition::new(vec![IndexField::asc("a"), IndexField::desc("a")]);
        assert_eq!(dup.validate(), Err(IndexError::DuplicateField("a".to_string())));
    }

    #[test]
    fn test_deserialize_defaults_ascending() {
        let def: IndexDefinition =
            serde_json::from_str(r#"{"fields":[{"name":"a"},{"name":"b","ascending":false}]}"#).unwrap();
        assert_eq!(def.ascending(), vec![true, false]);
    }
}
