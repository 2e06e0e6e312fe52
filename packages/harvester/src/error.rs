//! Error types for the harvester.
//!
//! Every pipeline step returns `HarvesterError`. Only bucket creation is
//! recovered from (see [`crate::publish::ensure_bucket`]); everything else
//! aborts the run.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid date format.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD (e.g., 2021-01-17)")]
    InvalidDate(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download the registry index.
    #[error("Failed to download index from {url}: {source}")]
    IndexDownload {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to download the instrument archive.
    #[error("Failed to download archive from {url}: {source}")]
    ArchiveDownload {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// No download link paired with the requested file type.
    #[error("No download_link found for file_type '{file_type}' in the first index record")]
    LinkNotFound { file_type: String },

    /// Zip archive could not be read.
    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Archive contained no file entries.
    #[error("Archive {} contains no files", .path.display())]
    EmptyArchive { path: PathBuf },

    /// Archive contained more than one file entry.
    #[error("Archive {} contains {} files, expected exactly one: {}", .path.display(), .entries.len(), .entries.join(", "))]
    AmbiguousArchive { path: PathBuf, entries: Vec<String> },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Remote object store call failed.
    #[error("Object store {operation} failed: {message}")]
    ObjectStore { operation: String, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
