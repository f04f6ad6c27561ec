use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::FormError;
use crate::render::{FieldChange, FormPayload, render_form};
use crate::spec::{FieldDescriptor, FieldSchema};
use crate::store::ValueStore;
use crate::theme::Theme;
use crate::validate::validate;
use crate::value::{FieldValue, FormValues};

/// Completion handler receiving every field's value on submit.
pub type SubmitHandler = Box<dyn FnMut(FormValues)>;

/// Lifecycle of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// No schema bound yet.
    Uninitialized,
    /// Store populated from the schema, no edits since.
    Initialized,
    /// At least one field changed since the last bind.
    Editing,
}

impl FormState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormState::Uninitialized => "uninitialized",
            FormState::Initialized => "initialized",
            FormState::Editing => "editing",
        }
    }
}

/// What [`FormController::bind_schema`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// New schema reference; the store was rebuilt.
    Initialized,
    /// Same reference as the bound schema; nothing was touched.
    Unchanged,
}

/// Owns the value store of one form and wires field changes into it.
pub struct FormController {
    submit_label: String,
    on_submit: SubmitHandler,
    schema: Option<Arc<FieldSchema>>,
    store: ValueStore,
    state: FormState,
}

impl FormController {
    pub fn new(
        submit_label: impl Into<String>,
        on_submit: impl FnMut(FormValues) + 'static,
    ) -> Self {
        Self {
            submit_label: submit_label.into(),
            on_submit: Box::new(on_submit),
            schema: None,
            store: ValueStore::default(),
            state: FormState::Uninitialized,
        }
    }

    /// Construct and bind in one step.
    pub fn with_schema(
        schema: Arc<FieldSchema>,
        submit_label: impl Into<String>,
        on_submit: impl FnMut(FormValues) + 'static,
    ) -> Result<Self, FormError> {
        let mut form = Self::new(submit_label, on_submit);
        form.bind_schema(schema)?;
        Ok(form)
    }

    /// Bind `schema`, rebuilding the store unless it is the schema already
    /// bound (compared by reference). A rejected schema leaves the form as
    /// it was.
    pub fn bind_schema(&mut self, schema: Arc<FieldSchema>) -> Result<BindOutcome, FormError> {
        if let Some(current) = &self.schema
            && Arc::ptr_eq(current, &schema)
        {
            debug!(fields = schema.len(), "schema already bound; keeping values");
            return Ok(BindOutcome::Unchanged);
        }

        if let Err(err) = validate(&schema).into_result() {
            warn!(error = %err, "schema rejected");
            return Err(err);
        }

        self.store = ValueStore::initialize(&schema);
        self.schema = Some(schema);
        self.state = FormState::Initialized;
        debug!(fields = self.store.len(), "schema bound");
        Ok(BindOutcome::Initialized)
    }

    pub fn schema(&self) -> Option<&Arc<FieldSchema>> {
        self.schema.as_ref()
    }

    /// Descriptors of the bound schema; empty before the first bind.
    pub fn fields(&self) -> &[FieldDescriptor] {
        self.schema
            .as_deref()
            .map(FieldSchema::fields)
            .unwrap_or_default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn submit_label(&self) -> &str {
        &self.submit_label
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Current value of `name`, or `None` when the field is not in the schema.
    pub fn current_value(&self, name: &str) -> Option<FieldValue> {
        self.schema
            .as_deref()
            .and_then(|schema| schema.get(name))
            .map(|field| self.current_value_of(field))
    }

    pub(crate) fn current_value_of(&self, field: &FieldDescriptor) -> FieldValue {
        self.store.resolve(field)
    }

    /// Replace the value of one field. Other fields are never touched.
    pub fn set_field_value(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        let value = value.into();
        if self.store.replace(name, value).is_none() {
            warn!(field = name, "update for a field outside the bound schema");
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.state = FormState::Editing;
        debug!(field = name, "field updated");
        Ok(())
    }

    /// Apply a change emitted by a rendered control.
    pub fn apply(&mut self, change: FieldChange) -> Result<(), FormError> {
        self.set_field_value(&change.name, change.value)
    }

    /// Every field of the bound schema with its current value.
    pub fn values(&self) -> FormValues {
        match &self.schema {
            Some(schema) => self.store.snapshot(schema),
            None => FormValues::default(),
        }
    }

    /// Hand the current values to the completion handler, once per call.
    pub fn submit(&mut self) {
        let values = self.values();
        debug!(fields = values.len(), "form submitted");
        (self.on_submit)(values);
    }

    pub fn render(&self, theme: &dyn Theme) -> FormPayload {
        render_form(self, theme)
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("submit_label", &self.submit_label)
            .field("schema", &self.schema)
            .field("store", &self.store)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
