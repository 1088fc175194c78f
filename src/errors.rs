use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the species dataset. All of them are fatal:
/// the process does not start with a partially loaded dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The dataset is not valid JSON or does not match the record shape
    #[error("malformed dataset: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A record is stored under a key that is not its own id
    #[error("record stored under key {key:?} has id {id:?}")]
    KeyMismatch { key: String, id: String },
    /// A record id cannot be ordered numerically
    #[error("record id {0:?} is not a plain decimal integer")]
    NonNumericId(String),
    /// The name search index could not be built
    #[error("failed to build name index: {0}")]
    Search(#[from] SearchError),
}

/// Errors from the fuzzy name index.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("index construction failed: {0}")]
    Index(#[from] fst::Error),
    #[error("query automaton could not be built: {0}")]
    Automaton(#[from] fst::automaton::LevenshteinError),
}

/// Errors raised while reading the RON configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Top-level error for the server binaries.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using DatasetError
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Type alias for Results using SearchError
pub type SearchResult<T> = Result<T, SearchError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
