//! Core renderer trait for diagram output
//!
//! This trait defines the interface for serializing a laid-out graph
//! into a diagram format.

use anyhow::Result;

use super::{Database, LayoutPlan};

/// Core trait for diagram renderers
///
/// The renderer receives the graph together with the layout plan that
/// was computed for it and produces the serialized diagram.
///
/// # Example
/// ```
/// use relgraph::core::Renderer;
/// use relgraph::plugins::drawio::DrawioRenderer;
///
/// let renderer = DrawioRenderer::new();
/// assert_eq!(renderer.format(), "drawio");
/// ```
pub trait Renderer<D: Database>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the positioned graph into the output format
    fn render(&self, database: &D, plan: &LayoutPlan) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the supported output format (also used as the file extension)
    fn format(&self) -> &'static str;
}
