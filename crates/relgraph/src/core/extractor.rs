//! Core extractor trait for building relationship graphs
//!
//! An extractor reads caller-supplied descriptors and fills a database
//! with nodes and typed edges.

use anyhow::Result;

use super::Database;

/// Core trait for relationship extractors
///
/// This trait represents the first stage of the pipeline. Each input
/// shape (class registry, instance set) has its own extractor.
///
/// # Example
/// ```
/// use relgraph::core::{Database, Extractor, GraphKind, RelationshipGraph};
/// use relgraph::plugins::class::{ClassExtractor, ClassSource};
///
/// let classes = vec![ClassSource::new("Animal"), ClassSource::new("Dog").with_base("Animal")];
/// let mut graph = RelationshipGraph::new(GraphKind::Class);
/// ClassExtractor::new().extract(&classes, &mut graph).unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub trait Extractor<D: Database>: Send + Sync {
    /// The input this extractor reads
    type Input: ?Sized;

    /// Populate the database from the input
    fn extract(&self, input: &Self::Input, database: &mut D) -> Result<()>;

    /// Get the name of this extractor
    fn name(&self) -> &'static str;

    /// Get the version of this extractor
    fn version(&self) -> &'static str;
}
