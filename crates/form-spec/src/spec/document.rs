use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormError;
use crate::spec::schema::FieldSchema;
use crate::theme::StaticTheme;

/// Serializable bundle a host loads to build one form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormDocument {
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<StaticTheme>,
    pub fields: FieldSchema,
}

fn default_submit_label() -> String {
    "Submit".to_string()
}

impl FormDocument {
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        serde_json::from_str(json).map_err(FormError::DocumentParse)
    }
}

/// JSON Schema describing [`FormDocument`].
pub fn document_schema() -> Value {
    Value::from(schemars::schema_for!(FormDocument))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_label_defaults() {
        let doc = FormDocument::from_json(r#"{ "fields": [] }"#).expect("document");
        assert_eq!(doc.submit_label, "Submit");
        assert!(doc.theme.is_none());
        assert!(doc.fields.is_empty());
    }

    #[test]
    fn malformed_document_reports_parse_error() {
        let err = FormDocument::from_json(r#"{ "fields": [ { "name": "x" } ] }"#)
            .expect_err("missing label and type");
        assert!(matches!(err, FormError::DocumentParse(_)));
    }

    #[test]
    fn document_schema_lists_fields_property() {
        let schema = document_schema();
        assert!(schema["properties"]["fields"].is_object());
    }
}
