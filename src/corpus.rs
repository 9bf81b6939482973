pub mod discover;
pub mod walker;

pub use discover::{
    discover_documents, jobs_from_directory, jobs_from_rows, retain_prefix, DiscoveredFile,
};
pub use walker::{CorpusWalker, DocumentJob, FailedDocument, JobInput, WalkReport, WalkerConfig};

use crate::document::DocumentError;

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to list {path}: {source}")]
    Discover {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to persist `{document}`: {source}")]
    Persist {
        document: String,
        #[source]
        source: DocumentError,
    },
}
