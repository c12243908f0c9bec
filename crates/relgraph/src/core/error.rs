//! Core error types for diagram generation
//!
//! This module defines the error types surfaced by every stage of the
//! extract → layout → render pipeline.

use thiserror::Error;

/// Core error types for diagram generation
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Unresolvable registry: {reason}")]
    UnresolvableRegistry { reason: String },

    #[error("Empty graph: there are no nodes to lay out")]
    EmptyGraph,

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Duplicate node: {id}")]
    DuplicateNode { id: String },

    #[error("Invalid edge: {message}")]
    InvalidEdge { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new unresolvable registry error
    pub fn unresolvable_registry(reason: impl Into<String>) -> Self {
        Self::UnresolvableRegistry {
            reason: reason.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    /// Create a new duplicate node error
    pub fn duplicate_node(id: impl Into<String>) -> Self {
        Self::DuplicateNode { id: id.into() }
    }

    /// Create a new invalid edge error
    pub fn invalid_edge(message: impl Into<String>) -> Self {
        Self::InvalidEdge {
            message: message.into(),
        }
    }
}
