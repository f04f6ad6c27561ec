use std::collections::BTreeMap;

use crate::spec::{FieldDescriptor, FieldSchema};
use crate::value::{FieldValue, FormValues};

/// Per-form mapping from field name to current value.
///
/// Only the owning controller can change entries, one key at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    entries: BTreeMap<String, FieldValue>,
}

impl ValueStore {
    /// Fresh store for `schema`: every field gets its descriptor value or
    /// empty text.
    pub fn initialize(schema: &FieldSchema) -> Self {
        let empty = Self::default();
        let entries = schema
            .iter()
            .map(|field| (field.name.clone(), empty.resolve(field)))
            .collect();
        Self { entries }
    }

    /// Value for `field`: store entry, then descriptor value, then empty text.
    pub fn resolve(&self, field: &FieldDescriptor) -> FieldValue {
        self.entries
            .get(&field.name)
            .or(field.value.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Swap the value of an existing entry, returning the previous one.
    /// Unknown names are left alone.
    pub(crate) fn replace(&mut self, name: &str, value: FieldValue) -> Option<FieldValue> {
        self.entries
            .get_mut(name)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// Submission view: one entry per schema field, in schema order.
    pub fn snapshot(&self, schema: &FieldSchema) -> FormValues {
        FormValues::from_entries(
            schema
                .iter()
                .map(|field| (field.name.clone(), self.resolve(field)))
                .collect(),
        )
    }
}
