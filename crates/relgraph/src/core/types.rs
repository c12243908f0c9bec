//! Core type definitions for diagram generation
//!
//! This module contains the small value types shared by every stage:
//! tree direction, link style, relationship kinds and node style tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction in which the tree grows away from its roots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Roots at the bottom, children above
    Up,
    /// Roots at the top, children below
    #[default]
    Down,
    /// Roots on the right, children to the left
    Left,
    /// Roots on the left, children to the right
    Right,
}

impl Direction {
    /// Get all valid direction names
    pub fn variants() -> &'static [&'static str] {
        &["up", "down", "left", "right"]
    }

    /// Returns true if depth levels are stacked vertically (up or down)
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Returns true if depth levels are laid out side by side (left or right)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Returns true if the depth axis runs against screen coordinates (up or left)
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How connectors between nodes are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// Right-angled connectors
    #[default]
    Orthogonal,
    /// Direct lines between nodes
    Straight,
    /// Rounded orthogonal connectors
    Curved,
}

impl LinkStyle {
    /// Get all valid link style names
    pub fn variants() -> &'static [&'static str] {
        &["orthogonal", "straight", "curved"]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStyle::Orthogonal => "orthogonal",
            LinkStyle::Straight => "straight",
            LinkStyle::Curved => "curved",
        }
    }
}

impl FromStr for LinkStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "orthogonal" => Ok(LinkStyle::Orthogonal),
            "straight" => Ok(LinkStyle::Straight),
            "curved" => Ok(LinkStyle::Curved),
            _ => Err(format!("Unknown link style: {}", s)),
        }
    }
}

impl fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship kind carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Child type → parent type
    Inherits,
    /// Owner → component that is always present ("has-a")
    Composes,
    /// Owner → component that may be present ("uses")
    Associates,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Inherits => write!(f, "inherits"),
            EdgeKind::Composes => write!(f, "composes"),
            EdgeKind::Associates => write!(f, "associates"),
        }
    }
}

/// What the nodes of a graph describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Class,
    Instance,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Class => write!(f, "class"),
            GraphKind::Instance => write!(f, "instance"),
        }
    }
}

/// Fill/stroke colour pairs used to tell instance types apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteColor {
    Green,
    Blue,
    Yellow,
    Red,
    Purple,
    Grey,
}

impl PaletteColor {
    const CYCLE: [PaletteColor; 6] = [
        PaletteColor::Green,
        PaletteColor::Blue,
        PaletteColor::Yellow,
        PaletteColor::Red,
        PaletteColor::Purple,
        PaletteColor::Grey,
    ];

    /// Palette entry for the `index`-th distinct type, wrapping around
    pub fn nth(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    pub fn fill(&self) -> &'static str {
        match self {
            PaletteColor::Green => "#d5e8d4",
            PaletteColor::Blue => "#dae8fc",
            PaletteColor::Yellow => "#fff2cc",
            PaletteColor::Red => "#f8cecc",
            PaletteColor::Purple => "#e1d5e7",
            PaletteColor::Grey => "#f5f5f5",
        }
    }

    pub fn stroke(&self) -> &'static str {
        match self {
            PaletteColor::Green => "#82b366",
            PaletteColor::Blue => "#6c8ebf",
            PaletteColor::Yellow => "#d6b656",
            PaletteColor::Red => "#b85450",
            PaletteColor::Purple => "#9673a6",
            PaletteColor::Grey => "#666666",
        }
    }
}

/// Style tag handed to the renderer for each node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    /// Plain rounded rectangle
    Class,
    /// Rounded rectangle filled with the owning type's palette colour
    Instance(PaletteColor),
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleTag::Class => write!(f, "class"),
            StyleTag::Instance(color) => write!(f, "instance:{:?}", color),
        }
    }
}
