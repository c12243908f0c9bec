//! Class diagram plugin
//!
//! Reads a class registry and extracts inheritance and composition edges.

mod extractor;
mod source;

pub use extractor::{extract_class_graph, extract_class_graph_with, ClassExtractor};
pub use source::{AssignmentSite, Cardinality, ClassRegistry, ClassSource, FieldSource};
