//! Class relationship extractor
//!
//! Turns a class registry into a relationship graph: one node per class,
//! `inherits` edges for registered bases, and `composes`/`associates`
//! edges for fields whose type is another registered class.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, span, trace, warn, Level};

use super::source::{AssignmentSite, Cardinality, ClassSource, FieldSource};
use crate::core::{
    AssociationPolicy, Database, DiagramError, EdgeKind, ExtractionConfig, Extractor, FieldKind,
    GraphKind, GraphNode, RelationshipEdge, RelationshipGraph, TypeDescriptor, TypeField,
};

/// Name lookup over the registered classes
struct ClassIndex<'a> {
    names: HashSet<&'a str>,
    by_lowercase: HashMap<String, &'a str>,
}

impl<'a> ClassIndex<'a> {
    fn build(classes: &'a [ClassSource]) -> Result<Self> {
        if classes.is_empty() {
            return Err(DiagramError::unresolvable_registry("registry contains no classes").into());
        }

        let mut names = HashSet::new();
        let mut by_lowercase = HashMap::new();
        for class in classes {
            let name = class.name.trim();
            if name.is_empty() {
                return Err(
                    DiagramError::unresolvable_registry("registry contains a nameless class")
                        .into(),
                );
            }
            if !names.insert(name) {
                return Err(DiagramError::unresolvable_registry(format!(
                    "class {} is registered twice",
                    name
                ))
                .into());
            }
            by_lowercase.entry(name.to_lowercase()).or_insert(name);
        }

        Ok(Self {
            names,
            by_lowercase,
        })
    }

    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Resolve a declared type such as `Veterinarian`, `list[Animal]` or
    /// `Option<Owner>` to a registered class
    fn resolve_declared(&self, declared: &str) -> Option<&'a str> {
        let declared = declared.trim();
        if let Some(&name) = self.names.get(declared) {
            return Some(name);
        }
        declared
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| !token.is_empty())
            .filter_map(|token| self.names.get(token).copied())
            .last()
    }

    /// Infer a type from the field name: `_veterinarian` ⇒ `Veterinarian`
    fn infer_from_name(&self, field_name: &str) -> Option<&'a str> {
        let key = field_name.trim_start_matches('_').to_lowercase();
        self.by_lowercase.get(&key).copied()
    }

    fn resolve_field(&self, field: &FieldSource) -> Option<&'a str> {
        match &field.declared_type {
            Some(declared) => self.resolve_declared(declared),
            None => self.infer_from_name(&field.name),
        }
    }
}

/// Class registry extractor
pub struct ClassExtractor {
    config: ExtractionConfig,
}

impl ClassExtractor {
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Edge kind for a field that resolved to a registered class
    fn edge_kind(&self, field: &FieldSource) -> EdgeKind {
        match self.config.association_policy {
            AssociationPolicy::AssignmentSite => match field.assigned_in {
                AssignmentSite::Constructor | AssignmentSite::Unknown => EdgeKind::Composes,
                AssignmentSite::Method => EdgeKind::Associates,
            },
            AssociationPolicy::Cardinality => match field.cardinality {
                Cardinality::Single => EdgeKind::Composes,
                Cardinality::Collection => EdgeKind::Associates,
            },
            AssociationPolicy::ComposeAll => EdgeKind::Composes,
        }
    }

    fn describe(&self, class: &ClassSource, index: &ClassIndex<'_>) -> TypeDescriptor {
        let name = class.name.trim();
        let mut descriptor = TypeDescriptor::new(name);

        for base in &class.bases {
            let base = base.trim();
            if base == name {
                warn!(class = name, "Ignoring class listed as its own base");
            } else if !index.contains(base) {
                trace!(class = name, base, "Ignoring unregistered base");
            } else if !descriptor.bases.iter().any(|b| b == base) {
                descriptor.bases.push(base.to_string());
            }
        }

        for field in &class.fields {
            let resolved = index.resolve_field(field);
            trace!(class = name, field = %field.name, resolved = ?resolved, "Resolved field");
            descriptor.fields.push(match resolved {
                Some(type_name) => TypeField::composed(&field.name, type_name),
                None => TypeField::primitive(&field.name),
            });
        }

        descriptor
    }
}

impl Default for ClassExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor<RelationshipGraph> for ClassExtractor {
    type Input = [ClassSource];

    fn extract(&self, classes: &[ClassSource], graph: &mut RelationshipGraph) -> Result<()> {
        let extract_span = span!(Level::INFO, "extract_classes", class_count = classes.len());
        let _enter = extract_span.enter();

        info!(policy = %self.config.association_policy, "Starting class extraction");

        let index = ClassIndex::build(classes)?;
        let descriptors: Vec<TypeDescriptor> =
            classes.iter().map(|c| self.describe(c, &index)).collect();

        // All nodes first so every edge endpoint exists
        for descriptor in &descriptors {
            graph.add_node(GraphNode::for_type(descriptor.clone()))?;
        }

        for descriptor in &descriptors {
            for base in &descriptor.bases {
                graph.insert_edge(RelationshipEdge::new(
                    &descriptor.name,
                    base,
                    EdgeKind::Inherits,
                ))?;
            }
        }

        for (class, descriptor) in classes.iter().zip(&descriptors) {
            for (source, field) in class.fields.iter().zip(&descriptor.fields) {
                let FieldKind::Composed(target) = &field.kind else {
                    continue;
                };
                if *target == descriptor.name {
                    trace!(class = %descriptor.name, field = %field.name, "Skipping self reference");
                    continue;
                }
                let kind = self.edge_kind(source);
                let edge =
                    RelationshipEdge::new(&descriptor.name, target, kind).with_label(&field.name);
                if !graph.insert_edge(edge)? {
                    debug!(
                        class = %descriptor.name,
                        field = %field.name,
                        target = %target,
                        "Relationship already recorded"
                    );
                }
            }
        }

        if let Some(cycle) = graph.inheritance_cycle() {
            warn!(cycle = ?cycle, "Inheritance cycle detected");
        }

        debug!(
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            "Class extraction completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "class"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

/// Extract a class graph with the default association policy
pub fn extract_class_graph(classes: &[ClassSource]) -> Result<RelationshipGraph> {
    extract_class_graph_with(classes, ExtractionConfig::default())
}

/// Extract a class graph with an explicit configuration
pub fn extract_class_graph_with(
    classes: &[ClassSource],
    config: ExtractionConfig,
) -> Result<RelationshipGraph> {
    let mut graph = RelationshipGraph::new(GraphKind::Class);
    ClassExtractor::with_config(config).extract(classes, &mut graph)?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> Vec<ClassSource> {
        vec![
            ClassSource::new("Animal")
                .with_field(FieldSource::new("name").assigned_in(AssignmentSite::Constructor))
                .with_field(FieldSource::new("age").assigned_in(AssignmentSite::Constructor)),
            ClassSource::new("Dog").with_base("Animal"),
            ClassSource::new("Cat").with_base("Animal"),
        ]
    }

    #[test]
    fn test_inheritance_edges() {
        let graph = extract_class_graph(&animals()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge("Dog", "Animal", EdgeKind::Inherits));
        assert!(graph.has_edge("Cat", "Animal", EdgeKind::Inherits));
    }

    #[test]
    fn test_empty_registry_fails() {
        let err = extract_class_graph(&[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::UnresolvableRegistry { .. })
        ));
    }

    #[test]
    fn test_duplicate_class_fails() {
        let classes = vec![ClassSource::new("Dog"), ClassSource::new("Dog")];
        let err = extract_class_graph(&classes).unwrap_err();
        assert!(err.to_string().contains("registered twice"));
    }

    #[test]
    fn test_unknown_and_self_bases_ignored() {
        let classes = vec![
            ClassSource::new("Animal").with_base("object"),
            ClassSource::new("Dog").with_base("Dog").with_base("Animal"),
        ];
        let graph = extract_class_graph(&classes).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge("Dog", "Animal", EdgeKind::Inherits));
        assert_eq!(graph.out_degree("Animal"), 0);
    }

    #[test]
    fn test_multiple_bases_recorded() {
        let classes = vec![
            ClassSource::new("Swimmer"),
            ClassSource::new("Walker"),
            ClassSource::new("Duck").with_base("Swimmer").with_base("Walker"),
        ];
        let graph = extract_class_graph(&classes).unwrap();
        assert!(graph.has_edge("Duck", "Swimmer", EdgeKind::Inherits));
        assert!(graph.has_edge("Duck", "Walker", EdgeKind::Inherits));
    }

    #[test]
    fn test_composition_from_declared_type() {
        let classes = vec![
            ClassSource::new("Engine"),
            ClassSource::new("Car").with_field(
                FieldSource::new("motor")
                    .with_type("Engine")
                    .assigned_in(AssignmentSite::Constructor),
            ),
        ];
        let graph = extract_class_graph(&classes).unwrap();
        assert!(graph.has_edge("Car", "Engine", EdgeKind::Composes));
        assert_eq!(graph.edge_list()[0].label.as_deref(), Some("motor"));
    }

    #[test]
    fn test_association_for_later_assignment() {
        let classes = vec![
            ClassSource::new("Veterinarian"),
            ClassSource::new("PetShop").with_field(
                FieldSource::new("veterinarian").assigned_in(AssignmentSite::Method),
            ),
        ];
        let graph = extract_class_graph(&classes).unwrap();
        assert!(graph.has_edge("PetShop", "Veterinarian", EdgeKind::Associates));
        assert!(!graph.has_edge("PetShop", "Veterinarian", EdgeKind::Composes));
    }

    #[test]
    fn test_type_inferred_from_field_name() {
        let classes = vec![
            ClassSource::new("Veterinarian"),
            ClassSource::new("Clinic").with_field(FieldSource::new("_veterinarian")),
        ];
        let graph = extract_class_graph(&classes).unwrap();
        // Unknown assignment site defaults to composes
        assert!(graph.has_edge("Clinic", "Veterinarian", EdgeKind::Composes));

        let clinic = graph.get_node("Clinic").unwrap().as_type().unwrap();
        assert_eq!(
            clinic.fields[0].kind,
            FieldKind::Composed("Veterinarian".to_string())
        );
    }

    #[test]
    fn test_container_declared_type_resolves() {
        let classes = vec![
            ClassSource::new("Animal"),
            ClassSource::new("Owner").with_field(
                FieldSource::new("pets")
                    .with_type("list[Animal]")
                    .collection(),
            ),
        ];
        let graph = extract_class_graph_with(
            &classes,
            ExtractionConfig::new(AssociationPolicy::Cardinality),
        )
        .unwrap();
        assert!(graph.has_edge("Owner", "Animal", EdgeKind::Associates));
    }

    #[test]
    fn test_unresolved_fields_are_primitive() {
        let classes = vec![ClassSource::new("Animal").with_field(FieldSource::new("name").with_type("str"))];
        let graph = extract_class_graph(&classes).unwrap();
        let animal = graph.get_node("Animal").unwrap().as_type().unwrap();
        assert_eq!(animal.fields[0].kind, FieldKind::Primitive);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_fields_yield_one_edge() {
        let field = FieldSource::new("engine").with_type("Engine");
        let classes = vec![
            ClassSource::new("Engine"),
            ClassSource::new("Car")
                .with_field(field.clone())
                .with_field(field),
        ];
        let graph = extract_class_graph(&classes).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_self_typed_field_is_not_an_edge() {
        let classes = vec![ClassSource::new("Node").with_field(FieldSource::new("next").with_type("Node"))];
        let graph = extract_class_graph(&classes).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_policies() {
        let field = FieldSource::new("pets")
            .with_type("Animal")
            .assigned_in(AssignmentSite::Constructor)
            .collection();

        let site = ClassExtractor::new();
        assert_eq!(site.edge_kind(&field), EdgeKind::Composes);

        let cardinality =
            ClassExtractor::with_config(ExtractionConfig::new(AssociationPolicy::Cardinality));
        assert_eq!(cardinality.edge_kind(&field), EdgeKind::Associates);

        let compose_all =
            ClassExtractor::with_config(ExtractionConfig::new(AssociationPolicy::ComposeAll));
        let later = field.assigned_in(AssignmentSite::Method);
        assert_eq!(compose_all.edge_kind(&later), EdgeKind::Composes);
        assert_eq!(site.edge_kind(&later), EdgeKind::Associates);
    }

    #[test]
    fn test_cycle_is_tolerated() {
        let classes = vec![
            ClassSource::new("A").with_base("B"),
            ClassSource::new("B").with_base("A"),
        ];
        let graph = extract_class_graph(&classes).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.inheritance_cycle().is_some());
    }
}
