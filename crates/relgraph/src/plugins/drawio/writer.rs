//! Atomic diagram file writer

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, span, Level};

use crate::core::DiagramError;

/// Write a rendered diagram to `dir/file_name`
///
/// The directory is created if needed. Contents go to a temporary file in
/// the same directory which is then renamed onto the target, so readers
/// never observe a half-written diagram. Returns the absolute path.
pub fn write_diagram(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    let write_span = span!(Level::DEBUG, "write_diagram", dir = %dir.display(), file_name);
    let _enter = write_span.enter();

    if file_name.is_empty() {
        return Err(DiagramError::render_error("output file name is empty").into());
    }

    fs::create_dir_all(dir).map_err(|e| {
        DiagramError::render_error(format!(
            "cannot create output directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| {
        DiagramError::render_error(format!(
            "cannot create temporary file in {}: {}",
            dir.display(),
            e
        ))
    })?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| DiagramError::render_error(format!("cannot write diagram: {}", e)))?;

    let target = dir.join(file_name);
    file.persist(&target).map_err(|e| {
        DiagramError::render_error(format!("cannot write {}: {}", target.display(), e.error))
    })?;

    let absolute = target.canonicalize().map_err(|e| {
        DiagramError::render_error(format!("cannot resolve {}: {}", target.display(), e))
    })?;

    debug!(path = %absolute.display(), bytes = contents.len(), "Diagram written");
    Ok(absolute)
}
