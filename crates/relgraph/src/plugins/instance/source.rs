//! Instance set input

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::{DiagramError, InstanceDescriptor};

/// A named, ordered collection of instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSet {
    /// Set name; used to derive the default file name
    pub name: String,
    pub instances: Vec<InstanceDescriptor>,
}

impl InstanceSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instances: Vec::new(),
        }
    }

    pub fn with_instance(mut self, instance: InstanceDescriptor) -> Self {
        self.instances.push(instance);
        self
    }

    /// Parse an instance set from JSON
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| {
            DiagramError::unresolvable_registry(format!("malformed instance set: {}", e)).into()
        })
    }

    pub fn get(&self, id: &str) -> Option<&InstanceDescriptor> {
        self.instances.iter().find(|i| i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_set_from_json() {
        let set = InstanceSet::from_json(
            r#"{
                "name": "pet_instances",
                "instances": [
                    {"id": "fido", "label": "Fido", "type_name": "Dog"},
                    {"id": "john", "label": "John", "type_name": "Owner",
                     "fields": [{"name": "pets", "value": {"collection": ["fido"]}}]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(set.instances.len(), 2);
        assert!(set.get("fido").unwrap().fields.is_empty());
        assert_eq!(set.get("john").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_malformed_instance_set() {
        let err = InstanceSet::from_json(r#"{"name": "x"}"#).unwrap_err();
        assert!(err.to_string().contains("malformed instance set"));
    }
}
