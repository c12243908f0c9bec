//! Instance relationship extractor
//!
//! One node per instance. A field holding a single reference yields a
//! `composes` edge; a field holding a collection yields one `associates`
//! edge per element.

use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info, span, trace, warn, Level};

use crate::core::{
    Database, EdgeKind, Extractor, FieldValue, GraphKind, GraphNode, InstanceDescriptor,
    PaletteColor, RelationshipEdge, RelationshipGraph,
};

/// Instance set extractor
pub struct InstanceExtractor;

impl InstanceExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Palette colour per owning type, in first-seen order
    fn palette(instances: &[InstanceDescriptor]) -> HashMap<&str, PaletteColor> {
        let mut colors = HashMap::new();
        for instance in instances {
            let next = colors.len();
            colors
                .entry(instance.type_name.as_str())
                .or_insert_with(|| PaletteColor::nth(next));
        }
        colors
    }
}

impl Default for InstanceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor<RelationshipGraph> for InstanceExtractor {
    type Input = [InstanceDescriptor];

    fn extract(
        &self,
        instances: &[InstanceDescriptor],
        graph: &mut RelationshipGraph,
    ) -> Result<()> {
        let extract_span = span!(
            Level::INFO,
            "extract_instances",
            instance_count = instances.len()
        );
        let _enter = extract_span.enter();

        info!("Starting instance extraction");

        let colors = Self::palette(instances);
        for instance in instances {
            let color = colors
                .get(instance.type_name.as_str())
                .copied()
                .unwrap_or(PaletteColor::Grey);
            graph.add_node(GraphNode::for_instance(instance.clone(), color))?;
        }

        for instance in instances {
            for field in &instance.fields {
                let kind = match &field.value {
                    FieldValue::Primitive(_) => continue,
                    FieldValue::Reference(_) => EdgeKind::Composes,
                    FieldValue::Collection(_) => EdgeKind::Associates,
                };
                for target in field.value.referenced_ids() {
                    if !graph.contains(target) {
                        warn!(
                            instance = %instance.id,
                            field = %field.name,
                            target = %target,
                            "Skipping reference to unknown instance"
                        );
                        continue;
                    }
                    let edge =
                        RelationshipEdge::new(&instance.id, target, kind).with_label(&field.name);
                    if !graph.insert_edge(edge)? {
                        trace!(instance = %instance.id, target = %target, "Duplicate reference");
                    }
                }
            }
        }

        debug!(
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            type_count = colors.len(),
            "Instance extraction completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "instance"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

/// Extract an instance graph
///
/// An empty slice yields an empty graph; the layout stage rejects it.
pub fn extract_instance_graph(instances: &[InstanceDescriptor]) -> Result<RelationshipGraph> {
    let mut graph = RelationshipGraph::new(GraphKind::Instance);
    InstanceExtractor::new().extract(instances, &mut graph)?;
    Ok(graph)
}
