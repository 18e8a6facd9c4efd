use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors produced while loading, validating or persisting a manpage index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to read index {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index {path} is not a regular file")]
    NotAFile { path: PathBuf },

    #[error("index {path} is {len} bytes, larger than the {limit} byte limit")]
    TooLarge { path: PathBuf, len: u64, limit: u64 },

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("json error in {path}: {message}")]
    Json { path: PathBuf, message: String },

    #[error("unsupported index format version: expected {expected}, found {found}")]
    UnsupportedFormatVersion { expected: u32, found: u32 },

    #[error("invalid index entry {key:?}: {reason}")]
    InvalidEntry { key: String, reason: String },

    #[error("invalid suite alias {alias:?}: {reason}")]
    InvalidSuiteAlias { alias: String, reason: String },
}
