//! Instance diagram plugin
//!
//! Reads caller-built object descriptors and extracts ownership and
//! usage edges between them.

mod extractor;
mod source;

pub use extractor::{extract_instance_graph, InstanceExtractor};
pub use source::InstanceSet;
