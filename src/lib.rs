pub mod app;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod document;
pub mod integrity;
pub mod labels;
pub mod oracle;
pub mod segmenter;
pub mod shared;
