pub mod document;
pub mod field;
pub mod schema;

pub use document::{FormDocument, document_schema};
pub use field::{FieldDescriptor, FieldType, SelectOption};
pub use schema::FieldSchema;
