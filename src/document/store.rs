use super::{Document, DocumentError};
use crate::shared::atomic_write_file;
use std::fs;
use std::path::Path;

pub fn read_document(path: &Path) -> Result<Document, DocumentError> {
    let raw = fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DocumentError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Pretty-printed (two-space indent), UTF-8 preserved, written atomically.
pub fn write_document(path: &Path, document: &Document) -> Result<(), DocumentError> {
    let encoded =
        serde_json::to_string_pretty(document).map_err(|source| DocumentError::Encode {
            path: path.display().to_string(),
            source,
        })?;
    atomic_write_file(path, encoded.as_bytes()).map_err(|source| DocumentError::Write {
        path: path.display().to_string(),
        source,
    })
}
