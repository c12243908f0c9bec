//! Relationship graph
//!
//! Nodes are classes or instances; edges are typed `inherits`, `composes`
//! or `associates` relationships. The graph keeps insertion order so every
//! later stage is deterministic.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

use super::{
    Database, DiagramError, EdgeKind, GraphKind, InstanceDescriptor, PaletteColor, StyleTag,
    TypeDescriptor,
};

/// Payload of a graph node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeDescriptor {
    Type(TypeDescriptor),
    Instance(InstanceDescriptor),
}

/// A node in the relationship graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub style: StyleTag,
    pub descriptor: NodeDescriptor,
}

impl GraphNode {
    /// Node for a class; the id and label are the class name
    pub fn for_type(descriptor: TypeDescriptor) -> Self {
        Self {
            id: descriptor.name.clone(),
            label: descriptor.name.clone(),
            style: StyleTag::Class,
            descriptor: NodeDescriptor::Type(descriptor),
        }
    }

    /// Node for an instance, coloured by its owning type
    pub fn for_instance(descriptor: InstanceDescriptor, color: PaletteColor) -> Self {
        Self {
            id: descriptor.id.clone(),
            label: descriptor.display_label(),
            style: StyleTag::Instance(color),
            descriptor: NodeDescriptor::Instance(descriptor),
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self.descriptor, NodeDescriptor::Type(_))
    }

    pub fn as_type(&self) -> Option<&TypeDescriptor> {
        match &self.descriptor {
            NodeDescriptor::Type(t) => Some(t),
            NodeDescriptor::Instance(_) => None,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceDescriptor> {
        match &self.descriptor {
            NodeDescriptor::Instance(i) => Some(i),
            NodeDescriptor::Type(_) => None,
        }
    }
}

/// A typed relationship between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    pub label: Option<String>,
}

impl RelationshipEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn same_relationship(&self, other: &RelationshipEdge) -> bool {
        self.from == other.from && self.to == other.to && self.kind == other.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

/// Nodes plus typed edges; every edge endpoint is a known node
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipGraph {
    kind: GraphKind,
    nodes: Vec<GraphNode>,
    edges: Vec<RelationshipEdge>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl RelationshipGraph {
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node; ids must be unique
    pub fn insert_node(&mut self, node: GraphNode) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(DiagramError::duplicate_node(node.id).into());
        }
        trace!(id = %node.id, label = %node.label, "Adding node");
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Add an edge, returning `false` if the same relationship already exists
    ///
    /// Both endpoints must already be in the graph. `inherits` edges must
    /// join two type nodes and may not loop back onto their source.
    pub fn insert_edge(&mut self, edge: RelationshipEdge) -> Result<bool> {
        let (Some(from), Some(to)) = (self.get_node(&edge.from), self.get_node(&edge.to)) else {
            return Err(DiagramError::invalid_edge(format!(
                "{} -> {} references a node that is not in the graph",
                edge.from, edge.to
            ))
            .into());
        };

        if edge.kind == EdgeKind::Inherits {
            if edge.from == edge.to {
                return Err(DiagramError::invalid_edge(format!(
                    "{} cannot inherit from itself",
                    edge.from
                ))
                .into());
            }
            if !from.is_type() || !to.is_type() {
                return Err(DiagramError::invalid_edge(format!(
                    "inherits edge {} -> {} must join two types",
                    edge.from, edge.to
                ))
                .into());
            }
        }

        if self.edges.iter().any(|e| e.same_relationship(&edge)) {
            trace!(from = %edge.from, to = %edge.to, kind = %edge.kind, "Skipping duplicate edge");
            return Ok(false);
        }

        trace!(from = %edge.from, to = %edge.to, kind = %edge.kind, "Adding edge");
        self.edges.push(edge);
        Ok(true)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a node in insertion order
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node_list(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edge_list(&self) -> &[RelationshipEdge] {
        &self.edges
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a RelationshipEdge> {
        self.edges.iter().filter(move |e| e.from == id)
    }

    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a RelationshipEdge> {
        self.edges.iter().filter(move |e| e.to == id)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &RelationshipEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.outgoing(id).count()
    }

    pub fn has_edge(&self, from: &str, to: &str, kind: EdgeKind) -> bool {
        self.edges
            .iter()
            .any(|e| e.from == from && e.to == to && e.kind == kind)
    }

    /// Find one inheritance cycle, if any
    ///
    /// Returns the node ids along the cycle starting at the first node
    /// re-entered. Only the first cycle found is reported.
    pub fn inheritance_cycle(&self) -> Option<Vec<String>> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut path = Vec::new();
        for start in 0..self.nodes.len() {
            if marks[start] == Mark::Unvisited {
                if let Some(cycle) = self.visit_bases(start, &mut marks, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn visit_bases(
        &self,
        idx: usize,
        marks: &mut [Mark],
        path: &mut Vec<usize>,
    ) -> Option<Vec<String>> {
        marks[idx] = Mark::Active;
        path.push(idx);

        let id = &self.nodes[idx].id;
        for edge in self.edges_of_kind(EdgeKind::Inherits).filter(|e| &e.from == id) {
            let Some(next) = self.node_index(&edge.to) else {
                continue;
            };
            match marks[next] {
                Mark::Active => {
                    let start = path.iter().position(|&p| p == next).unwrap_or(0);
                    return Some(
                        path[start..]
                            .iter()
                            .map(|&i| self.nodes[i].id.clone())
                            .collect(),
                    );
                }
                Mark::Unvisited => {
                    if let Some(cycle) = self.visit_bases(next, marks, path) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }

        path.pop();
        marks[idx] = Mark::Done;
        None
    }
}

impl Database for RelationshipGraph {
    type Node = GraphNode;
    type Edge = RelationshipEdge;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        self.insert_node(node)
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.insert_edge(edge).map(|_| ())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.nodes.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_graph(names: &[&str]) -> RelationshipGraph {
        let mut graph = RelationshipGraph::new(GraphKind::Class);
        for name in names {
            graph
                .insert_node(GraphNode::for_type(TypeDescriptor::new(*name)))
                .unwrap();
        }
        graph
    }

    fn downcast(err: anyhow::Error) -> DiagramError {
        err.downcast::<DiagramError>().unwrap()
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut graph = class_graph(&["Animal"]);
        let err = graph
            .insert_node(GraphNode::for_type(TypeDescriptor::new("Animal")))
            .unwrap_err();
        assert!(matches!(downcast(err), DiagramError::DuplicateNode { id } if id == "Animal"));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_edge_requires_known_endpoints() {
        let mut graph = class_graph(&["Dog"]);
        let err = graph
            .insert_edge(RelationshipEdge::new("Dog", "Animal", EdgeKind::Inherits))
            .unwrap_err();
        assert!(matches!(downcast(err), DiagramError::InvalidEdge { .. }));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_self_inheritance_rejected() {
        let mut graph = class_graph(&["Animal"]);
        let result = graph.insert_edge(RelationshipEdge::new("Animal", "Animal", EdgeKind::Inherits));
        assert!(result.is_err());
    }

    #[test]
    fn test_inherits_between_instances_rejected() {
        let mut graph = RelationshipGraph::new(GraphKind::Instance);
        graph
            .insert_node(GraphNode::for_instance(
                InstanceDescriptor::new("fido", "Fido", "Dog"),
                PaletteColor::Green,
            ))
            .unwrap();
        graph
            .insert_node(GraphNode::for_instance(
                InstanceDescriptor::new("rex", "Rex", "Dog"),
                PaletteColor::Green,
            ))
            .unwrap();
        let result = graph.insert_edge(RelationshipEdge::new("fido", "rex", EdgeKind::Inherits));
        assert!(result.is_err());
        assert!(graph
            .insert_edge(RelationshipEdge::new("fido", "rex", EdgeKind::Associates))
            .unwrap());
    }

    #[test]
    fn test_duplicate_edge_deduplicated() {
        let mut graph = class_graph(&["Owner", "Animal"]);
        let first = RelationshipEdge::new("Owner", "Animal", EdgeKind::Composes).with_label("pet");
        let second =
            RelationshipEdge::new("Owner", "Animal", EdgeKind::Composes).with_label("other");
        assert!(graph.insert_edge(first).unwrap());
        assert!(!graph.insert_edge(second).unwrap());
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_list()[0].label.as_deref(), Some("pet"));

        // A different kind between the same nodes is a separate relationship
        assert!(graph
            .insert_edge(RelationshipEdge::new("Owner", "Animal", EdgeKind::Associates))
            .unwrap());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_degree_queries() {
        let mut graph = class_graph(&["Animal", "Dog", "Cat"]);
        graph
            .insert_edge(RelationshipEdge::new("Dog", "Animal", EdgeKind::Inherits))
            .unwrap();
        graph
            .insert_edge(RelationshipEdge::new("Cat", "Animal", EdgeKind::Inherits))
            .unwrap();
        assert_eq!(graph.out_degree("Animal"), 0);
        assert_eq!(graph.incoming("Animal").count(), 2);
        assert!(graph.has_edge("Dog", "Animal", EdgeKind::Inherits));
        assert!(!graph.has_edge("Animal", "Dog", EdgeKind::Inherits));
    }

    #[test]
    fn test_inheritance_cycle_detection() {
        let mut graph = class_graph(&["A", "B", "C"]);
        graph
            .insert_edge(RelationshipEdge::new("A", "B", EdgeKind::Inherits))
            .unwrap();
        graph
            .insert_edge(RelationshipEdge::new("B", "C", EdgeKind::Inherits))
            .unwrap();
        assert!(graph.inheritance_cycle().is_none());

        graph
            .insert_edge(RelationshipEdge::new("C", "A", EdgeKind::Inherits))
            .unwrap();
        let cycle = graph.inheritance_cycle().unwrap();
        assert_eq!(cycle, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_clear() {
        let mut graph = class_graph(&["A", "B"]);
        graph.clear();
        assert!(graph.is_empty());
        assert!(!graph.contains("A"));
    }
}
