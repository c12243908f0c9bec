//! Descriptors attached to graph nodes
//!
//! A [`TypeDescriptor`] is the resolved, immutable view of one class after
//! extraction. An [`InstanceDescriptor`] describes one live object and is
//! supplied directly by the caller.

use serde::{Deserialize, Serialize};

/// Resolved kind of a class field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Value whose type is not a registered class
    Primitive,
    /// Reference to another registered class
    Composed(String),
}

/// A field of a resolved type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeField {
    pub name: String,
    pub kind: FieldKind,
}

impl TypeField {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Primitive,
        }
    }

    pub fn composed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Composed(type_name.into()),
        }
    }

    pub fn is_composed(&self) -> bool {
        matches!(self.kind, FieldKind::Composed(_))
    }
}

/// Static description of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    /// Declared bases that are registered, in declaration order
    pub bases: Vec<String>,
    pub fields: Vec<TypeField>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Fields that point at another registered class
    pub fn composed_fields(&self) -> impl Iterator<Item = &TypeField> {
        self.fields.iter().filter(|f| f.is_composed())
    }
}

/// Value held by an instance field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Plain value, kept only for display
    Primitive(String),
    /// Single reference to another instance by id
    Reference(String),
    /// Collection of references to other instances by id
    Collection(Vec<String>),
}

impl FieldValue {
    /// Ids of every instance this value points at
    pub fn referenced_ids(&self) -> &[String] {
        match self {
            FieldValue::Primitive(_) => &[],
            FieldValue::Reference(id) => std::slice::from_ref(id),
            FieldValue::Collection(ids) => ids,
        }
    }
}

/// A named field of an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceField {
    pub name: String,
    pub value: FieldValue,
}

/// Runtime description of one object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceDescriptor {
    /// Unique id within an instance set
    pub id: String,
    /// Display label, e.g. "Fido"
    pub label: String,
    /// Name of the owning type, e.g. "Dog"
    pub type_name: String,
    #[serde(default)]
    pub fields: Vec<InstanceField>,
}

impl InstanceDescriptor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_primitive(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(InstanceField {
            name: name.into(),
            value: FieldValue::Primitive(value.into()),
        });
        self
    }

    pub fn with_reference(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.fields.push(InstanceField {
            name: name.into(),
            value: FieldValue::Reference(target.into()),
        });
        self
    }

    pub fn with_collection<I, S>(mut self, name: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.push(InstanceField {
            name: name.into(),
            value: FieldValue::Collection(targets.into_iter().map(Into::into).collect()),
        });
        self
    }

    /// Label shown on the diagram node, e.g. "Fido (Dog)"
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.label, self.type_name)
    }
}
