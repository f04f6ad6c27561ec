use serde::Serialize;
use thiserror::Error;

/// A single problem found in a field schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    /// Index of the offending descriptor.
    pub position: usize,
    pub field: String,
    pub message: String,
    pub code: String,
}

/// Contract violations reported by the form engine.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("schema rejected: {}", describe_issues(.0))]
    InvalidSchema(Vec<SchemaIssue>),
    #[error("field '{0}' is not part of the bound schema")]
    UnknownField(String),
    #[error("field '{field}' has no option at index {index}")]
    NoSuchOption { field: String, index: usize },
    #[error("field '{0}' is not a select field")]
    NotSelectable(String),
    #[error("field '{0}' only accepts a choice from its options")]
    NotEditable(String),
    #[error("failed to parse form document: {0}")]
    DocumentParse(#[source] serde_json::Error),
}

fn describe_issues(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
