//! Tree layout plugin
//!
//! Assigns depth levels and ordinals to relationship graph nodes.

mod layout;

pub use layout::{compute_layout, TreeLayout};
