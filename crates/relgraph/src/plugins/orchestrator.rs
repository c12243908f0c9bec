//! Plugin orchestrator for coordinating the diagram pipeline
//!
//! The orchestrator manages the flow of data through all plugins:
//! Extractor → Graph → Layout → Renderer → file

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info, span, Level};

use crate::core::{
    Database, DiagramError, DiagramOptions, Direction, ExtractionConfig, LayoutAlgorithm,
    LayoutPlan, LinkStyle, RelationshipGraph, Renderer,
};
use crate::plugins::class::{extract_class_graph_with, ClassRegistry};
use crate::plugins::drawio::{write_diagram, DrawioRenderer};
use crate::plugins::instance::{extract_instance_graph, InstanceSet};
use crate::plugins::tree::TreeLayout;

/// Plugin orchestrator that runs the whole pipeline
///
/// Holds the extraction settings and the renderer so callers can go from
/// a registry or instance set to a file on disk in one call.
pub struct Orchestrator {
    extraction: ExtractionConfig,
    renderer: DrawioRenderer,
}

impl Orchestrator {
    /// Create an orchestrator with default extraction settings
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Create an orchestrator with specific extraction settings
    pub fn with_config(extraction: ExtractionConfig) -> Self {
        Self {
            extraction,
            renderer: DrawioRenderer::new(),
        }
    }

    pub fn extraction_config(&self) -> &ExtractionConfig {
        &self.extraction
    }

    /// Extract the class graph of a registry and plan its layout
    ///
    /// Useful when the caller wants to inspect the pipeline without
    /// writing a file.
    pub fn plan_class_diagram(
        &self,
        registry: &ClassRegistry,
        direction: Direction,
        link_style: LinkStyle,
    ) -> Result<(RelationshipGraph, LayoutPlan)> {
        let graph = extract_class_graph_with(&registry.classes, self.extraction)?;
        let plan = TreeLayout::with_hints(direction, link_style).layout(&graph)?;
        Ok((graph, plan))
    }

    /// Extract the instance graph of a set and plan its layout
    pub fn plan_instance_diagram(
        &self,
        instances: &InstanceSet,
    ) -> Result<(RelationshipGraph, LayoutPlan)> {
        let graph = extract_instance_graph(&instances.instances)?;
        let plan = TreeLayout::with_hints(Direction::Down, LinkStyle::Orthogonal).layout(&graph)?;
        Ok((graph, plan))
    }

    /// Generate a class diagram file and return its absolute path
    pub fn generate_class_diagram(
        &self,
        registry: &ClassRegistry,
        options: &DiagramOptions,
    ) -> Result<PathBuf> {
        let diagram_span = span!(
            Level::INFO,
            "generate_class_diagram",
            registry = %registry.name,
            class_count = registry.classes.len()
        );
        let _enter = diagram_span.enter();

        info!(
            direction = %options.direction,
            link_style = %options.link_style,
            policy = %self.extraction.association_policy,
            "Generating class diagram"
        );

        let (graph, plan) =
            self.plan_class_diagram(registry, options.direction, options.link_style)?;
        let path = self.render_and_write(&graph, &plan, options, &registry.name)?;

        info!(path = %path.display(), "Class diagram written");
        Ok(path)
    }

    /// Generate an instance diagram file and return its absolute path
    ///
    /// The direction and link style of `options` are ignored; instance
    /// diagrams are always drawn top-down with orthogonal links.
    pub fn generate_instance_diagram(
        &self,
        instances: &InstanceSet,
        options: &DiagramOptions,
    ) -> Result<PathBuf> {
        let diagram_span = span!(
            Level::INFO,
            "generate_instance_diagram",
            set = %instances.name,
            instance_count = instances.instances.len()
        );
        let _enter = diagram_span.enter();

        info!("Generating instance diagram");

        let (graph, plan) = self.plan_instance_diagram(instances)?;
        let path = self.render_and_write(&graph, &plan, options, &instances.name)?;

        info!(path = %path.display(), "Instance diagram written");
        Ok(path)
    }

    fn render_and_write(
        &self,
        graph: &RelationshipGraph,
        plan: &LayoutPlan,
        options: &DiagramOptions,
        source_name: &str,
    ) -> Result<PathBuf> {
        let render_span = span!(Level::DEBUG, "pipeline_render");
        let _render_enter = render_span.enter();
        let xml = self.renderer.render(graph, plan)?;
        debug!(
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            output_len = xml.len(),
            "Rendering completed"
        );
        drop(_render_enter);

        let dir = options.resolve_output_dir().map_err(|e| {
            DiagramError::render_error(format!("cannot resolve output directory: {}", e))
        })?;
        let file_name = options.resolve_file_name(source_name);
        write_diagram(&dir, &file_name, &xml)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssociationPolicy, EdgeKind, InstanceDescriptor};
    use crate::plugins::class::{ClassSource, FieldSource};
    use tempfile::TempDir;

    fn pets() -> ClassRegistry {
        ClassRegistry::new("demo.model_classes")
            .with_class(ClassSource::new("Animal"))
            .with_class(ClassSource::new("Dog").with_base("Animal"))
            .with_class(ClassSource::new("Cat").with_base("Animal"))
            .with_class(ClassSource::new("Owner").with_field(
                FieldSource::new("pets").with_type("list[Animal]").collection(),
            ))
    }

    #[test]
    fn test_orchestrator_default() {
        let orchestrator = Orchestrator::default();
        assert_eq!(
            orchestrator.extraction_config().association_policy,
            AssociationPolicy::AssignmentSite
        );
    }

    #[test]
    fn test_class_diagram_written() {
        let dir = TempDir::new().unwrap();
        let options = DiagramOptions::new().with_output_dir(dir.path());
        let path = Orchestrator::new()
            .generate_class_diagram(&pets(), &options)
            .unwrap();

        assert!(path.is_absolute());
        assert_eq!(path.file_name().unwrap(), "model_classes_diagram.drawio");
        let xml = std::fs::read_to_string(&path).unwrap();
        assert_eq!(xml.matches(r#"vertex="1""#).count(), 4);
    }

    #[test]
    fn test_policy_changes_edge_kind() {
        let registry = pets();
        let (graph, _) = Orchestrator::with_config(ExtractionConfig::new(
            AssociationPolicy::Cardinality,
        ))
        .plan_class_diagram(&registry, Direction::Down, LinkStyle::Orthogonal)
        .unwrap();
        assert!(graph.has_edge("Owner", "Animal", EdgeKind::Associates));
    }

    #[test]
    fn test_empty_registry_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let options = DiagramOptions::new().with_output_dir(dir.path());
        let err = Orchestrator::new()
            .generate_class_diagram(&ClassRegistry::new("empty"), &options)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::UnresolvableRegistry { .. })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_instance_diagram_ignores_hints() {
        let set = InstanceSet::new("household")
            .with_instance(InstanceDescriptor::new("fido", "Fido", "Dog"))
            .with_instance(
                InstanceDescriptor::new("john", "John", "Owner").with_collection("pets", ["fido"]),
            );
        let orchestrator = Orchestrator::new();
        let (_, plan) = orchestrator.plan_instance_diagram(&set).unwrap();
        assert_eq!(plan.direction, Direction::Down);
        assert_eq!(plan.link_style, LinkStyle::Orthogonal);

        let dir = TempDir::new().unwrap();
        let options = DiagramOptions::new()
            .with_output_dir(dir.path())
            .with_file_name("family")
            .with_direction(Direction::Left)
            .with_link_style(LinkStyle::Curved);
        let path = orchestrator.generate_instance_diagram(&set, &options).unwrap();
        assert_eq!(path.file_name().unwrap(), "family.drawio");
        let xml = std::fs::read_to_string(path).unwrap();
        assert!(!xml.contains("curved=1"));
    }

    #[test]
    fn test_empty_instance_set_is_empty_graph() {
        let dir = TempDir::new().unwrap();
        let options = DiagramOptions::new().with_output_dir(dir.path());
        let err = Orchestrator::new()
            .generate_instance_diagram(&InstanceSet::new("nothing"), &options)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::EmptyGraph)
        ));
    }
}
