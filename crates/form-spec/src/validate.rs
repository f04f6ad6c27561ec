use std::collections::HashMap;

use serde::Serialize;

use crate::error::{FormError, SchemaIssue};
use crate::spec::FieldSchema;

/// Outcome of checking a schema before it is bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaReport {
    pub valid: bool,
    pub issues: Vec<SchemaIssue>,
}

impl SchemaReport {
    pub fn into_result(self) -> Result<(), FormError> {
        if self.valid {
            Ok(())
        } else {
            Err(FormError::InvalidSchema(self.issues))
        }
    }
}

/// Checks names: each must be non-blank and unique within the schema.
pub fn validate(schema: &FieldSchema) -> SchemaReport {
    let mut issues = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (position, field) in schema.iter().enumerate() {
        if field.name.trim().is_empty() {
            issues.push(SchemaIssue {
                position,
                field: field.name.clone(),
                message: format!("field at position {} has an empty name", position),
                code: "empty_name".into(),
            });
            continue;
        }

        if let Some(first) = seen.get(field.name.as_str()) {
            issues.push(SchemaIssue {
                position,
                field: field.name.clone(),
                message: format!(
                    "field '{}' at position {} duplicates the name at position {}",
                    field.name, position, first
                ),
                code: "duplicate_name".into(),
            });
        } else {
            seen.insert(field.name.as_str(), position);
        }
    }

    SchemaReport {
        valid: issues.is_empty(),
        issues,
    }
}
