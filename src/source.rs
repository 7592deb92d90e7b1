use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Error;

/// Reads a PDF statement and renders its text, one line of the document per line
pub fn read_text(path: &Path) -> Result<String, Error> {
    let source_read = |source: Box<dyn std::error::Error + Send + Sync>| Error::SourceRead {
        path: path.to_owned(),
        source,
    };
    let content = fs::read(path).map_err(|err| source_read(err.into()))?;
    let text = pdf_extract::extract_text_from_mem(&content).map_err(|err| source_read(err.into()))?;
    debug!(
        bytes = content.len(),
        lines = text.lines().count(),
        "extracted statement text"
    );
    Ok(text)
}
