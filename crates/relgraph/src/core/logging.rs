//! Subscriber setup for the `tracing` events the pipeline emits
//!
//! Extraction, layout and rendering each run inside their own span
//! (`extract_class_graph`, `layout_tree`, `pipeline_render`, ...), so a
//! target filter is enough to follow one stage:
//!
//! ```bash
//! RUST_LOG="info,relgraph::plugins::tree=trace" relgraph classes --registry demos/pets.json
//! ```
//!
//! `RELGRAPH_LOG_LEVEL` and `RELGRAPH_LOG_FORMAT` fill in whatever the
//! caller leaves as `None`. Output always goes to stderr; stdout carries
//! the written diagram path or the `inspect` report.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Shape of each emitted log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// Multi-line with source locations and span enter/exit events
    Pretty,
    /// One JSON object per event
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

    fn layer(self) -> BoxedLayer {
        let base = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        match self {
            LogFormat::Compact => base.with_target(false).compact().boxed(),
            LogFormat::Pretty => base
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .pretty()
                .boxed(),
            LogFormat::Json => base
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .json()
                .boxed(),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level filter from, in order: the argument, `RELGRAPH_LOG_LEVEL`,
/// `RUST_LOG`, then `info`. An unparsable directive falls back to `info`.
fn resolve_filter(level: Option<&str>) -> EnvFilter {
    let directive = level
        .map(str::to_string)
        .or_else(|| std::env::var("RELGRAPH_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber
///
/// `level` accepts anything `EnvFilter` does (`debug`, `off`,
/// `relgraph::plugins::class=trace`, ...). `format` is one of
/// `compact`, `pretty` or `json`.
///
/// # Errors
/// Fails on an unknown format, before anything is installed, or when a
/// global subscriber is already set.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = match format
        .map(str::to_string)
        .or_else(|| std::env::var("RELGRAPH_LOG_FORMAT").ok())
    {
        Some(name) => {
            LogFormat::from_str(&name).map_err(|e| format!("Invalid log format: {}", e))?
        }
        None => LogFormat::Compact,
    };

    Registry::default()
        .with(format.layer().with_filter(resolve_filter(level)))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_format_round_trips() {
        for format in [LogFormat::Compact, LogFormat::Pretty, LogFormat::Json] {
            assert_eq!(LogFormat::from_str(format.as_str()).unwrap(), format);
            assert_eq!(format.to_string(), format.as_str());
        }
        assert_eq!(LogFormat::from_str("COMPACT").unwrap(), LogFormat::Compact);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(
            resolve_filter(Some("off")).max_level_hint(),
            Some(LevelFilter::OFF)
        );
        assert_eq!(
            resolve_filter(Some("relgraph::plugins::tree=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_bad_directive_falls_back_to_info() {
        assert_eq!(
            resolve_filter(Some("relgraph=loud")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
