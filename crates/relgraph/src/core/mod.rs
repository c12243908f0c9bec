//! Core abstractions for relationship diagrams
//!
//! This module defines the graph model, the traits each pipeline stage
//! implements, and the shared error, configuration and logging pieces.

mod config;
mod database;
mod descriptor;
mod error;
mod extractor;
mod graph;
mod layout;
pub mod logging;
mod renderer;
mod types;

pub use config::*;
pub use database::*;
pub use descriptor::*;
pub use error::*;
pub use extractor::*;
pub use graph::*;
pub use layout::*;
pub use logging::*;
pub use renderer::*;
pub use types::*;
