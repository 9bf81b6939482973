use super::{CorpusError, DocumentJob, JobInput};
use crate::document::{document_file_name, read_document, Document, MatchRow};
use crate::shared::EventLog;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl DiscoveredFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Regular `*.json` files in `dir` whose name starts with `prefix`, oldest
/// modification first; equal timestamps fall back to the file name.
pub fn discover_documents(
    dir: &Path,
    prefix: Option<&str>,
) -> Result<Vec<DiscoveredFile>, CorpusError> {
    let list_error = |source| CorpusError::Discover {
        path: dir.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".json") || name.starts_with('.') {
            continue;
        }
        if prefix.is_some_and(|prefix| !name.starts_with(prefix)) {
            continue;
        }
        let metadata = entry.metadata().map_err(list_error)?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().map_err(list_error)?;
        files.push(DiscoveredFile { path, modified });
    }

    files.sort_by(|a, b| {
        a.modified
            .cmp(&b.modified)
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(files)
}

/// One job per discovered document, named from the document's metadata like
/// every other output. A file that cannot be read keeps its own name; the
/// walk reports the read failure under it.
pub fn jobs_from_directory(
    dir: &Path,
    prefix: Option<&str>,
) -> Result<Vec<DocumentJob>, CorpusError> {
    Ok(discover_documents(dir, prefix)?
        .into_iter()
        .map(|file| {
            let name = read_document(&file.path)
                .map(|document| document_file_name(&document.meta))
                .unwrap_or_else(|_| file.file_name());
            DocumentJob {
                name,
                input: JobInput::File(file.path),
            }
        })
        .collect())
}

/// Keeps the jobs whose output name starts with `prefix`.
pub fn retain_prefix(jobs: Vec<DocumentJob>, prefix: Option<&str>) -> Vec<DocumentJob> {
    let Some(prefix) = prefix else {
        return jobs;
    };
    jobs.into_iter()
        .filter(|job| job.name.starts_with(prefix))
        .collect()
}

/// One job per row with a transcript, in spreadsheet order. Rows without a
/// transcript are logged and left out.
pub fn jobs_from_rows(rows: &[MatchRow], log: &EventLog) -> Vec<DocumentJob> {
    let mut jobs = Vec::new();
    for (position, row) in rows.iter().enumerate() {
        let document = Document::from_row(row, Vec::new());
        let name = document_file_name(&document.meta);
        let Some(transcript) = row.transcript() else {
            log.info(
                "corpus.row_without_transcript",
                &[("row", json!(position)), ("document", json!(name))],
            );
            continue;
        };
        jobs.push(DocumentJob {
            name,
            input: JobInput::Row {
                document: Box::new(document),
                transcript: transcript.to_string(),
            },
        });
    }
    jobs
}
