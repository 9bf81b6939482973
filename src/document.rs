pub mod model;
pub mod naming;
pub mod rows;
pub mod store;

pub use model::{Content, Document, Meta, Officials, Scoreline, Segment};
pub use naming::{display_cell, document_file_name};
pub use rows::{load_rows, MatchRow};
pub use store::{read_document, write_document};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode document for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
