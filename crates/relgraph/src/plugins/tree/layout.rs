//! Tree layout planner
//!
//! Class graphs grow from base classes towards subclasses along
//! `inherits` edges; composition and association edges are drawn as
//! cross links and do not shape the tree. Instance graphs grow along
//! every edge from the instances nothing points at.

use anyhow::Result;
use std::collections::VecDeque;
use tracing::{debug, info, span, trace, warn, Level};

use crate::core::{
    Database, DiagramError, Direction, EdgeKind, GraphKind, LayoutAlgorithm, LayoutPlan,
    LinkStyle, NodePlacement, RelationshipGraph,
};

/// Breadth-first tree layout
pub struct TreeLayout {
    direction: Direction,
    link_style: LinkStyle,
}

impl TreeLayout {
    pub fn new() -> Self {
        Self {
            direction: Direction::default(),
            link_style: LinkStyle::default(),
        }
    }

    pub fn with_hints(direction: Direction, link_style: LinkStyle) -> Self {
        Self {
            direction,
            link_style,
        }
    }

    /// Tree children of every node, by node index
    ///
    /// Returns the adjacency list and, per node, whether it has a tree parent.
    fn tree_edges(graph: &RelationshipGraph) -> (Vec<Vec<usize>>, Vec<bool>) {
        let n = graph.node_count();
        let mut children = vec![Vec::new(); n];
        let mut has_parent = vec![false; n];

        for edge in graph.edges() {
            let (Some(from), Some(to)) = (graph.node_index(&edge.from), graph.node_index(&edge.to))
            else {
                continue;
            };
            match graph.kind() {
                // inherits points child → parent; the tree runs parent → child
                GraphKind::Class if edge.kind == EdgeKind::Inherits => {
                    children[to].push(from);
                    has_parent[from] = true;
                }
                GraphKind::Class => {}
                GraphKind::Instance => {
                    children[from].push(to);
                    has_parent[to] = true;
                }
            }
        }

        (children, has_parent)
    }
}

/// Breadth-first depth assignment shared by the initial roots and any
/// node promoted to a root later
struct Walk<'a> {
    children: &'a [Vec<usize>],
    longest_chain: bool,
    is_root: Vec<bool>,
    depth: Vec<Option<usize>>,
    discovery: Vec<usize>,
    queue: VecDeque<usize>,
}

impl Walk<'_> {
    fn seed(&mut self, root: usize) {
        self.is_root[root] = true;
        self.depth[root] = Some(0);
        self.discovery.push(root);
        self.queue.push_back(root);
    }

    fn run(&mut self, graph: &RelationshipGraph) {
        let n = self.depth.len();
        while let Some(current) = self.queue.pop_front() {
            let Some(current_depth) = self.depth[current] else {
                continue;
            };
            let next_depth = current_depth + 1;
            for &child in &self.children[current] {
                match self.depth[child] {
                    None => {
                        self.depth[child] = Some(next_depth);
                        self.discovery.push(child);
                        self.queue.push_back(child);
                    }
                    // Roots stay at depth 0
                    Some(d)
                        if self.longest_chain
                            && !self.is_root[child]
                            && d < next_depth
                            && next_depth < n =>
                    {
                        trace!(node = %graph.node_list()[child].id, from = d, to = next_depth, "Deepening node");
                        self.depth[child] = Some(next_depth);
                        self.queue.push_back(child);
                    }
                    Some(_) => {}
                }
            }
        }
    }
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutAlgorithm<RelationshipGraph> for TreeLayout {
    type Output = LayoutPlan;

    fn layout(&self, graph: &RelationshipGraph) -> Result<LayoutPlan> {
        let layout_span = span!(
            Level::INFO,
            "layout_tree",
            node_count = graph.node_count(),
            graph_kind = %graph.kind()
        );
        let _enter = layout_span.enter();

        if graph.is_empty() {
            warn!("Nothing to lay out");
            return Err(DiagramError::EmptyGraph.into());
        }

        info!(direction = %self.direction, link_style = %self.link_style, "Starting layout");

        let n = graph.node_count();
        let (children, has_parent) = Self::tree_edges(graph);

        let mut roots: Vec<usize> = (0..n).filter(|&i| !has_parent[i]).collect();
        let mut depth: Vec<Option<usize>> = vec![None; n];
        let mut discovery: Vec<usize> = Vec::with_capacity(n);

        if roots.is_empty() {
            warn!("No root qualifies; placing every node as its own root");
            roots = (0..n).collect();
            for &root in &roots {
                depth[root] = Some(0);
                discovery.push(root);
            }
        } else {
            // Class graphs keep pushing a subclass below its deepest base so
            // every inherits edge points strictly upwards. Depths are capped
            // at n - 1, which bounds the walk when a cycle hangs off a root.
            let mut walk = Walk {
                children: &children,
                longest_chain: graph.kind() == GraphKind::Class,
                is_root: vec![false; n],
                depth,
                discovery,
                queue: VecDeque::new(),
            };
            for &root in &roots {
                walk.seed(root);
            }
            walk.run(graph);

            // A node the walk missed becomes a root and the walk resumes
            // from it, so only nodes still unreached are promoted next.
            for i in 0..n {
                if walk.depth[i].is_none() {
                    trace!(node = %graph.node_list()[i].id, "Unreachable node placed as root");
                    roots.push(i);
                    walk.seed(i);
                    walk.run(graph);
                }
            }

            depth = walk.depth;
            discovery = walk.discovery;
        }

        let mut ordinals = vec![0; n];
        let mut next_ordinal: Vec<usize> = Vec::new();
        for &i in &discovery {
            let d = depth[i].unwrap_or(0);
            if next_ordinal.len() <= d {
                next_ordinal.resize(d + 1, 0);
            }
            ordinals[i] = next_ordinal[d];
            next_ordinal[d] += 1;
        }

        let nodes = graph.node_list();
        let placements = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| NodePlacement {
                id: node.id.clone(),
                depth: depth[i].unwrap_or(0),
                ordinal: ordinals[i],
            })
            .collect();

        let plan = LayoutPlan {
            direction: self.direction,
            link_style: self.link_style,
            roots: roots.iter().map(|&i| nodes[i].id.clone()).collect(),
            placements,
        };

        debug!(
            root_count = plan.roots.len(),
            level_count = plan.max_depth() + 1,
            "Layout completed"
        );
        Ok(plan)
    }

    fn name(&self) -> &'static str {
        "tree"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn direction(&self) -> &'static str {
        self.direction.as_str()
    }
}

/// Compute a layout plan for a graph
pub fn compute_layout(
    graph: &RelationshipGraph,
    direction: Direction,
    link_style: LinkStyle,
) -> Result<LayoutPlan> {
    TreeLayout::with_hints(direction, link_style).layout(graph)
}
