//! Command-line interface for the relgraph utility
//!
//! Provides a CLI to turn JSON class registries and instance sets into
//! draw.io relationship diagrams.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use relgraph::core::logging::init_logging;
use relgraph::plugins::class::ClassRegistry;
use relgraph::plugins::instance::InstanceSet;
use relgraph::plugins::Orchestrator;
use relgraph::{
    AssociationPolicy, DiagramError, DiagramOptions, Direction, ExtractionConfig, LayoutPlan,
    LinkStyle, RelationshipGraph,
};

/// Relgraph - Generate draw.io relationship diagrams
#[derive(Parser)]
#[command(name = "relgraph")]
#[command(about = "Generate draw.io class and instance diagrams from JSON descriptors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a class diagram from a class registry
    Classes {
        /// Class registry JSON file (use - for stdin)
        #[arg(short, long)]
        registry: PathBuf,

        /// Directory to write the diagram into (defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Diagram file name (defaults to <registry>_diagram.drawio)
        #[arg(short, long)]
        file_name: Option<String>,

        /// Direction the inheritance tree grows in
        #[arg(long, value_enum, default_value_t = DirectionChoice::Down)]
        direction: DirectionChoice,

        /// How links are routed
        #[arg(long, value_enum, default_value_t = LinkStyleChoice::Orthogonal)]
        link_style: LinkStyleChoice,

        /// How field references are split between composition and association
        #[arg(long, value_enum, default_value_t = PolicyChoice::AssignmentSite)]
        association_policy: PolicyChoice,
    },

    /// Generate an instance diagram from an instance set
    Instances {
        /// Instance set JSON file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory to write the diagram into (defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Diagram file name (defaults to <set>_diagram.drawio)
        #[arg(short, long)]
        file_name: Option<String>,
    },

    /// Print the extracted graph and its layout plan as JSON
    Inspect {
        /// Class registry JSON file
        #[arg(long, conflicts_with = "instances", required_unless_present = "instances")]
        registry: Option<PathBuf>,

        /// Instance set JSON file
        #[arg(long)]
        instances: Option<PathBuf>,

        /// Layout direction (class registries only)
        #[arg(long, value_enum, default_value_t = DirectionChoice::Down)]
        direction: DirectionChoice,
    },
}

/// Layout directions
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum DirectionChoice {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl From<DirectionChoice> for Direction {
    fn from(value: DirectionChoice) -> Self {
        match value {
            DirectionChoice::Up => Direction::Up,
            DirectionChoice::Down => Direction::Down,
            DirectionChoice::Left => Direction::Left,
            DirectionChoice::Right => Direction::Right,
        }
    }
}

/// Link routing styles
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum LinkStyleChoice {
    /// Right-angled links
    #[default]
    Orthogonal,
    /// Direct lines
    Straight,
    /// Rounded links
    Curved,
}

impl From<LinkStyleChoice> for LinkStyle {
    fn from(value: LinkStyleChoice) -> Self {
        match value {
            LinkStyleChoice::Orthogonal => LinkStyle::Orthogonal,
            LinkStyleChoice::Straight => LinkStyle::Straight,
            LinkStyleChoice::Curved => LinkStyle::Curved,
        }
    }
}

/// Association policies
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum PolicyChoice {
    /// Constructor-assigned fields compose, later assignments associate
    #[default]
    AssignmentSite,
    /// Single values compose, collections associate
    Cardinality,
    /// Every resolved field composes
    ComposeAll,
}

impl From<PolicyChoice> for AssociationPolicy {
    fn from(value: PolicyChoice) -> Self {
        match value {
            PolicyChoice::AssignmentSite => AssociationPolicy::AssignmentSite,
            PolicyChoice::Cardinality => AssociationPolicy::Cardinality,
            PolicyChoice::ComposeAll => AssociationPolicy::ComposeAll,
        }
    }
}

/// Graph and plan printed by `inspect`
#[derive(Serialize)]
struct InspectReport<'a> {
    graph: &'a RelationshipGraph,
    plan: &'a LayoutPlan,
}

/// Main CLI application
pub struct RelgraphApp {
    orchestrator: Orchestrator,
}

impl RelgraphApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Create a new application instance with extraction settings
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self {
            orchestrator: Orchestrator::with_config(config),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("RELGRAPH_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("RELGRAPH_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Relgraph v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Classes {
                registry,
                output_dir,
                file_name,
                direction,
                link_style,
                association_policy,
            } => {
                self.orchestrator =
                    Orchestrator::with_config(ExtractionConfig::new(association_policy.into()));
                let options = Self::build_options(output_dir, file_name)
                    .with_direction(direction.into())
                    .with_link_style(link_style.into());
                self.classes_command(registry, &options, cli.verbose)
            }
            Commands::Instances {
                input,
                output_dir,
                file_name,
            } => {
                let options = Self::build_options(output_dir, file_name);
                self.instances_command(input, &options, cli.verbose)
            }
            Commands::Inspect {
                registry,
                instances,
                direction,
            } => self.inspect_command(registry, instances, direction, cli.verbose),
        }
    }

    fn build_options(output_dir: Option<PathBuf>, file_name: Option<String>) -> DiagramOptions {
        DiagramOptions {
            output_dir,
            file_name,
            ..DiagramOptions::default()
        }
    }

    /// Handle the classes command
    fn classes_command(
        &self,
        registry: PathBuf,
        options: &DiagramOptions,
        verbose: bool,
    ) -> Result<()> {
        let registry = self.load_registry(registry)?;

        if verbose {
            eprintln!(
                "Loaded registry '{}' with {} classes",
                registry.name,
                registry.classes.len()
            );
        }

        let path = self
            .orchestrator
            .generate_class_diagram(&registry, options)
            .context("Failed to generate class diagram")?;
        println!("{}", path.display());
        Ok(())
    }

    /// Handle the instances command
    fn instances_command(
        &self,
        input: PathBuf,
        options: &DiagramOptions,
        verbose: bool,
    ) -> Result<()> {
        let instances = self.load_instances(input)?;

        if verbose {
            eprintln!(
                "Loaded instance set '{}' with {} instances",
                instances.name,
                instances.instances.len()
            );
        }

        let path = self
            .orchestrator
            .generate_instance_diagram(&instances, options)
            .context("Failed to generate instance diagram")?;
        println!("{}", path.display());
        Ok(())
    }

    /// Handle the inspect command
    fn inspect_command(
        &self,
        registry: Option<PathBuf>,
        instances: Option<PathBuf>,
        direction: DirectionChoice,
        verbose: bool,
    ) -> Result<()> {
        let (graph, plan) = match (registry, instances) {
            (Some(path), _) => {
                let registry = self.load_registry(path)?;
                self.orchestrator.plan_class_diagram(
                    &registry,
                    direction.into(),
                    LinkStyle::default(),
                )?
            }
            (None, Some(path)) => {
                let instances = self.load_instances(path)?;
                self.orchestrator.plan_instance_diagram(&instances)?
            }
            (None, None) => return Err(anyhow!("Either --registry or --instances is required")),
        };

        if verbose {
            eprintln!(
                "Planned {} nodes across {} levels",
                plan.len(),
                plan.max_depth() + 1
            );
        }

        let report = InspectReport {
            graph: &graph,
            plan: &plan,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    fn load_registry(&self, path: PathBuf) -> Result<ClassRegistry> {
        let content = self.read_input(&path)?;
        debug!(bytes = content.len(), "Read class registry");
        ClassRegistry::from_json(&content)
            .with_context(|| format!("Failed to load class registry '{}'", path.display()))
    }

    fn load_instances(&self, path: PathBuf) -> Result<InstanceSet> {
        let content = self.read_input(&path)?;
        debug!(bytes = content.len(), "Read instance set");
        InstanceSet::from_json(&content)
            .with_context(|| format!("Failed to load instance set '{}'", path.display()))
    }

    /// Read input from a file, or from stdin when the path is `-`
    pub fn read_input(&self, path: &Path) -> Result<String> {
        if path.to_string_lossy() == "-" {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .map_err(DiagramError::from)
                .context("Failed to read input from stdin")?;
            Ok(content)
        } else {
            fs::read_to_string(path)
                .map_err(DiagramError::from)
                .with_context(|| format!("Failed to read input file '{}'", path.display()))
        }
    }
}

impl Default for RelgraphApp {
    fn default() -> Self {
        Self::new()
    }
}
