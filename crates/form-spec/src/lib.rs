#![allow(missing_docs)]

pub mod controller;
pub mod error;
pub mod render;
pub mod spec;
pub mod store;
pub mod theme;
pub mod validate;
pub mod value;

pub use controller::{BindOutcome, FormController, FormState, SubmitHandler};
pub use error::{FormError, SchemaIssue};
pub use render::{
    Control, ControlKind, FieldChange, FormPayload, Keyboard, LONG_TEXT_LINES, SubmitAction,
    render_field, render_form, render_json_ui, render_text,
};
pub use spec::{
    FieldDescriptor, FieldSchema, FieldType, FormDocument, SelectOption, document_schema,
};
pub use store::ValueStore;
pub use theme::{ControlStyle, PLACEHOLDER_COLOR_KEY, StaticTheme, Theme};
pub use validate::{SchemaReport, validate};
pub use value::{FieldValue, FormValues};
