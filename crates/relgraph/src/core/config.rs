//! Configuration for extraction and diagram output

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{Direction, LinkStyle};

/// File extension of every diagram written by this crate
pub const DIAGRAM_EXTENSION: &str = "drawio";

/// How a class field that points at another class becomes an edge
///
/// Whether such a field means "always has" (`composes`) or "may have"
/// (`associates`) cannot be read off the field alone, so the rule is
/// chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssociationPolicy {
    /// Set in the constructor ⇒ composes; set in a later method ⇒ associates;
    /// unknown ⇒ composes
    #[default]
    AssignmentSite,
    /// Collection field ⇒ associates; single field ⇒ composes
    Cardinality,
    /// Every resolved field composes
    ComposeAll,
}

impl AssociationPolicy {
    /// Get all valid policy names
    pub fn variants() -> &'static [&'static str] {
        &["assignment-site", "cardinality", "compose-all"]
    }
}

impl FromStr for AssociationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "assignment-site" => Ok(AssociationPolicy::AssignmentSite),
            "cardinality" => Ok(AssociationPolicy::Cardinality),
            "compose-all" => Ok(AssociationPolicy::ComposeAll),
            _ => Err(format!("Unknown association policy: {}", s)),
        }
    }
}

impl fmt::Display for AssociationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationPolicy::AssignmentSite => write!(f, "assignment-site"),
            AssociationPolicy::Cardinality => write!(f, "cardinality"),
            AssociationPolicy::ComposeAll => write!(f, "compose-all"),
        }
    }
}

/// Extraction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub association_policy: AssociationPolicy,
}

impl ExtractionConfig {
    pub fn new(association_policy: AssociationPolicy) -> Self {
        Self { association_policy }
    }
}

/// Where and how a diagram is written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagramOptions {
    /// Output directory; the current working directory when unset
    pub output_dir: Option<PathBuf>,
    /// Output file name; derived from the input name when unset
    pub file_name: Option<String>,
    pub direction: Direction,
    pub link_style: LinkStyle,
}

impl DiagramOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_link_style(mut self, link_style: LinkStyle) -> Self {
        self.link_style = link_style;
        self
    }

    /// Output directory, falling back to the current working directory
    pub fn resolve_output_dir(&self) -> std::io::Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }

    /// Output file name, falling back to `{stem}_diagram.drawio`
    ///
    /// Only the segment after the last `.` of `source_name` is used, so a
    /// dotted module path like `pets.model_classes` yields
    /// `model_classes_diagram.drawio`. Explicit names without the diagram
    /// extension get it appended.
    pub fn resolve_file_name(&self, source_name: &str) -> String {
        match &self.file_name {
            Some(name) => {
                let has_extension = Path::new(name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(DIAGRAM_EXTENSION));
                if has_extension {
                    name.clone()
                } else {
                    format!("{}.{}", name, DIAGRAM_EXTENSION)
                }
            }
            None => {
                let stem = source_name
                    .rsplit('.')
                    .next()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("relationships");
                format!("{}_diagram.{}", stem, DIAGRAM_EXTENSION)
            }
        }
    }
}
