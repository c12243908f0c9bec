//! Plugin implementations
//!
//! Each plugin fills one stage of the pipeline: extractors for class
//! registries and instance sets, the tree layout planner, and the
//! draw.io renderer. The orchestrator ties them together.

pub mod class;
pub mod drawio;
pub mod instance;
pub mod orchestrator;
pub mod tree;

pub use orchestrator::Orchestrator;
