//! Dynamically typed object tree backing the in-memory editor

use std::collections::HashMap;

use crate::host::PathEntry;

/// An object container: a runtime class plus its fields in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub class_name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Opaque text with the class default it resets to
    Scalar { value: String, default: String },
    /// Polymorphic sub-object slot, possibly empty
    Object(Option<Box<ObjectNode>>),
    /// Array of typed objects
    Array(Vec<ObjectNode>),
}

impl FieldValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        let value = value.into();
        FieldValue::Scalar {
            default: value.clone(),
            value,
        }
    }

    /// Text form of the field
    ///
    /// Object slots read as the class of their current value, arrays as their length.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Scalar { value, .. } => value.clone(),
            FieldValue::Object(Some(node)) => node.class_name.clone(),
            FieldValue::Object(None) => String::new(),
            FieldValue::Array(items) => items.len().to_string(),
        }
    }

    /// Back to the class default
    pub fn reset(&mut self) {
        match self {
            FieldValue::Scalar { value, default } => value.clone_from(default),
            FieldValue::Object(slot) => *slot = None,
            FieldValue::Array(items) => items.clear(),
        }
    }
}

impl ObjectNode {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.upsert(name, value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.iter_mut().find(|f| f.name == name).map(|f| &mut f.value)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn scalar(&self, name: &str) -> Option<&str> {
        match self.field(name)? {
            FieldValue::Scalar { value, .. } => Some(value.as_str()),
            _ => None,
        }
    }

    /// Overwrite a scalar field, `false` when `name` is missing or not a scalar
    pub fn set_scalar(&mut self, name: &str, new_value: &str) -> bool {
        match self.field_mut(name) {
            Some(FieldValue::Scalar { value, .. }) => {
                *value = new_value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Replace a field in place, or append it
    pub fn upsert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(Field { name, value }),
        }
    }

    /// Object reached by one path entry
    pub fn child(&self, entry: &PathEntry) -> Option<&ObjectNode> {
        match (self.field(&entry.name)?, entry.index) {
            (FieldValue::Object(Some(node)), None) => Some(node.as_ref()),
            (FieldValue::Array(items), Some(index)) => items.get(index),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, entry: &PathEntry) -> Option<&mut ObjectNode> {
        match (self.field_mut(&entry.name)?, entry.index) {
            (FieldValue::Object(Some(node)), None) => Some(node.as_mut()),
            (FieldValue::Array(items), Some(index)) => items.get_mut(index),
            _ => None,
        }
    }

    pub fn walk(&self, path: &[PathEntry]) -> Option<&ObjectNode> {
        let mut node = self;
        for entry in path {
            node = node.child(entry)?;
        }
        Some(node)
    }

    pub fn walk_mut(&mut self, path: &[PathEntry]) -> Option<&mut ObjectNode> {
        let mut node = self;
        for entry in path {
            node = node.child_mut(entry)?;
        }
        Some(node)
    }
}

/// Class templates known to the native object factory
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    templates: HashMap<String, ObjectNode>,
}

impl ClassRegistry {
    pub fn register(&mut self, template: ObjectNode) {
        self.templates.insert(template.class_name.clone(), template);
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.templates.contains_key(class_name)
    }

    /// Fresh instance with default field values, `None` for an unknown class
    pub fn instantiate(&self, class_name: &str) -> Option<ObjectNode> {
        self.templates.get(class_name).cloned()
    }
}
