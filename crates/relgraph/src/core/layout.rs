//! Core layout trait and layout plan
//!
//! A layout algorithm assigns every node a depth level and an ordinal
//! within that level. Direction and link style ride along unchanged as
//! hints for the renderer.

use anyhow::Result;
use serde::Serialize;

use super::{Database, Direction, LinkStyle};

/// Core trait for layout algorithms
///
/// This trait represents the layout layer that arranges graph nodes into
/// levels. It does not produce coordinates; that is left to the renderer.
///
/// # Example
/// ```
/// use relgraph::core::{GraphKind, LayoutAlgorithm, RelationshipGraph};
/// use relgraph::plugins::tree::TreeLayout;
///
/// let graph = RelationshipGraph::new(GraphKind::Class);
/// let layout = TreeLayout::new();
/// assert!(layout.layout(&graph).is_err());
/// ```
pub trait LayoutAlgorithm<D: Database>: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange elements in the database using this layout algorithm
    fn layout(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;

    /// Get the layout direction (up, down, left, right)
    fn direction(&self) -> &'static str;
}

/// Position hint for one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodePlacement {
    pub id: String,
    /// Distance from the root set
    pub depth: usize,
    /// Position within the depth level, in discovery order
    pub ordinal: usize,
}

/// Depth/ordinal hints for every node of a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutPlan {
    pub direction: Direction,
    pub link_style: LinkStyle,
    /// Root node ids, including disconnected nodes placed at depth 0
    pub roots: Vec<String>,
    /// One placement per node, in graph insertion order
    pub placements: Vec<NodePlacement>,
}

impl LayoutPlan {
    pub fn placement(&self, id: &str) -> Option<&NodePlacement> {
        self.placements.iter().find(|p| p.id == id)
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.placement(id).map(|p| p.depth)
    }

    pub fn max_depth(&self) -> usize {
        self.placements.iter().map(|p| p.depth).max().unwrap_or(0)
    }

    /// Placements grouped by depth, each level sorted by ordinal
    pub fn levels(&self) -> Vec<Vec<&NodePlacement>> {
        let mut levels: Vec<Vec<&NodePlacement>> = vec![Vec::new(); self.max_depth() + 1];
        for placement in &self.placements {
            levels[placement.depth].push(placement);
        }
        for level in &mut levels {
            level.sort_by_key(|p| p.ordinal);
        }
        levels
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> LayoutPlan {
        LayoutPlan {
            direction: Direction::Down,
            link_style: LinkStyle::Orthogonal,
            roots: vec!["Animal".into()],
            placements: vec![
                NodePlacement {
                    id: "Animal".into(),
                    depth: 0,
                    ordinal: 0,
                },
                NodePlacement {
                    id: "Cat".into(),
                    depth: 1,
                    ordinal: 1,
                },
                NodePlacement {
                    id: "Dog".into(),
                    depth: 1,
                    ordinal: 0,
                },
            ],
        }
    }

    #[test]
    fn test_levels_sorted_by_ordinal() {
        let plan = plan();
        let levels = plan.levels();
        assert_eq!(levels.len(), 2);
        let second: Vec<_> = levels[1].iter().map(|p| p.id.as_str()).collect();
        assert_eq!(second, vec!["Dog", "Cat"]);
    }

    #[test]
    fn test_lookups() {
        let plan = plan();
        assert_eq!(plan.depth_of("Cat"), Some(1));
        assert_eq!(plan.depth_of("Owner"), None);
        assert_eq!(plan.max_depth(), 1);
        assert_eq!(plan.len(), 3);
    }
}
