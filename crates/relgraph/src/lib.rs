//! Relgraph - Relationship diagrams for class registries and object graphs
//!
//! A library that extracts inheritance, composition and association
//! edges from a class registry or a set of object instances, plans a
//! tree layout for them, and writes the result as a draw.io diagram.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use relgraph::plugins::class::{ClassRegistry, ClassSource};
//! use relgraph::{generate_class_diagram, Direction, LinkStyle};
//!
//! let registry = ClassRegistry::new("pets")
//!     .with_class(ClassSource::new("Animal"))
//!     .with_class(ClassSource::new("Dog").with_base("Animal"));
//!
//! let path = generate_class_diagram(
//!     &registry,
//!     None,
//!     None,
//!     Direction::Down,
//!     LinkStyle::Orthogonal,
//! )
//! .unwrap();
//! println!("{}", path.display());
//! ```
//!
//! # Advanced Usage
//!
//! For more control, run the stages yourself:
//!
//! ```rust
//! use relgraph::prelude::*;
//!
//! let graph = extract_class_graph(&[
//!     ClassSource::new("Animal"),
//!     ClassSource::new("Dog").with_base("Animal"),
//! ])
//! .unwrap();
//! assert_eq!(graph.node_count(), 2);
//!
//! let plan = compute_layout(&graph, Direction::Down, LinkStyle::Orthogonal).unwrap();
//! assert_eq!(plan.depth_of("Dog"), Some(1));
//!
//! let xml = DrawioRenderer::new().render(&graph, &plan).unwrap();
//! assert!(xml.contains("mxGraphModel"));
//! ```

pub mod core;
pub mod plugins;

pub use core::*;

use std::path::{Path, PathBuf};

use plugins::class::ClassRegistry;
use plugins::instance::InstanceSet;
use plugins::Orchestrator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        AssociationPolicy, Database, DiagramError, DiagramOptions, Direction, EdgeKind,
        ExtractionConfig, Extractor, GraphKind, InstanceDescriptor, LayoutAlgorithm, LayoutPlan,
        LinkStyle, RelationshipGraph, Renderer,
    };
    pub use crate::plugins::class::{
        extract_class_graph, ClassExtractor, ClassRegistry, ClassSource, FieldSource,
    };
    pub use crate::plugins::drawio::{write_diagram, DrawioRenderer};
    pub use crate::plugins::instance::{extract_instance_graph, InstanceExtractor, InstanceSet};
    pub use crate::plugins::tree::{compute_layout, TreeLayout};
    pub use crate::plugins::Orchestrator;
}

fn options(
    output_dir: Option<&Path>,
    file_name: Option<&str>,
    direction: Direction,
    link_style: LinkStyle,
) -> DiagramOptions {
    DiagramOptions {
        output_dir: output_dir.map(Path::to_path_buf),
        file_name: file_name.map(str::to_string),
        direction,
        link_style,
    }
}

/// Generate a class diagram and return the absolute path written
///
/// `output_dir` defaults to the current directory and `file_name` to
/// `{registry name}_diagram.drawio`.
///
/// # Errors
/// * `UnresolvableRegistry` - the registry is empty or malformed
/// * `RenderError` - the output could not be written
pub fn generate_class_diagram(
    registry: &ClassRegistry,
    output_dir: Option<&Path>,
    file_name: Option<&str>,
    direction: Direction,
    link_style: LinkStyle,
) -> anyhow::Result<PathBuf> {
    Orchestrator::new().generate_class_diagram(
        registry,
        &options(output_dir, file_name, direction, link_style),
    )
}

/// Generate an instance diagram and return the absolute path written
///
/// Instance diagrams are always laid out top-down with orthogonal links.
///
/// # Errors
/// * `EmptyGraph` - the set has no instances
/// * `RenderError` - the output could not be written
pub fn generate_instance_diagram(
    instances: &InstanceSet,
    output_dir: Option<&Path>,
    file_name: Option<&str>,
) -> anyhow::Result<PathBuf> {
    Orchestrator::new().generate_instance_diagram(
        instances,
        &options(
            output_dir,
            file_name,
            Direction::Down,
            LinkStyle::Orthogonal,
        ),
    )
}
