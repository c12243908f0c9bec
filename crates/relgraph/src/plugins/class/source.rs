//! Class registry input
//!
//! A registry is the language-neutral stand-in for reflecting over a
//! module: each class lists its bases and the fields its constructor or
//! methods assign. Registries are usually loaded from JSON.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::DiagramError;

/// Where a field receives its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSite {
    /// Set while the object is constructed
    Constructor,
    /// Set later by a setter-like method
    Method,
    /// Not known
    #[default]
    Unknown,
}

/// Whether a field holds one value or many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    #[default]
    Single,
    Collection,
}

/// A field as declared by a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSource {
    pub name: String,
    /// Declared type, e.g. `Veterinarian` or `list[Animal]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    #[serde(default)]
    pub assigned_in: AssignmentSite,
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl FieldSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            assigned_in: AssignmentSite::Unknown,
            cardinality: Cardinality::Single,
        }
    }

    pub fn with_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    pub fn assigned_in(mut self, site: AssignmentSite) -> Self {
        self.assigned_in = site;
        self
    }

    pub fn collection(mut self) -> Self {
        self.cardinality = Cardinality::Collection;
        self
    }
}

/// One class of a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSource {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSource>,
}

impl ClassSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn with_field(mut self, field: FieldSource) -> Self {
        self.fields.push(field);
        self
    }
}

/// A named, ordered collection of classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRegistry {
    /// Registry (module) name; used to derive the default file name
    pub name: String,
    pub classes: Vec<ClassSource>,
}

impl ClassRegistry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: ClassSource) -> Self {
        self.classes.push(class);
        self
    }

    /// Parse a registry from JSON
    ///
    /// Malformed JSON is reported as an unresolvable registry.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| {
            DiagramError::unresolvable_registry(format!("malformed registry: {}", e)).into()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
