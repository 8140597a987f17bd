use crate::domain::error::{ListerError, ListerResult};
use crate::domain::model::OutputDocument;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write the document to `path` atomically.
///
/// The JSON goes to a temporary file in the destination directory which is
/// renamed over `path` only once fully written.
pub fn write_document(path: &Path, document: &OutputDocument, pretty: bool) -> ListerResult<()> {
    let io_err = |source: std::io::Error| ListerError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    if pretty {
        serde_json::to_writer_pretty(&mut tmp, document).map_err(|e| io_err(e.into()))?;
    } else {
        serde_json::to_writer(&mut tmp, document).map_err(|e| io_err(e.into()))?;
    }
    tmp.write_all(b"\n").map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
