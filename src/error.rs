//! Error types for the PDF joiner library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF joiner library
#[derive(Error, Debug)]
pub enum Error {
    /// Merge requested with fewer than two files in the list
    #[error("At least two PDF files are required to merge (the list has {count})")]
    NotEnoughFiles { count: usize },

    /// The writer failed while appending or saving. The cause is part of the
    /// message, so it is not exposed through `source()` as well.
    #[error("Failed to merge PDFs: {cause}")]
    Merge { cause: Box<Error> },

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No PDF files found matching pattern: {0}")]
    NoFilesMatched(String),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Wrap a writer failure so callers see a single merge-failure condition
    pub fn merge(cause: Error) -> Self {
        Error::Merge {
            cause: Box::new(cause),
        }
    }

    /// Whether this is the pre-merge validation failure rather than a writer failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::NotEnoughFiles { .. })
    }
}
