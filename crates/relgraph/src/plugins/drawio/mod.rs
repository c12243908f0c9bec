//! draw.io output plugin
//!
//! Renders relationship graphs as draw.io XML and writes them to disk.

mod renderer;
mod writer;

pub use renderer::{escape_xml, DrawioRenderer, NodeGeometry};
pub use writer::write_diagram;
