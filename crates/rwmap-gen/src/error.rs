use std::path::PathBuf;

/// Errors that abort a rewrite-map run. None of them are recoverable: a
/// partially written shard set is unusable.
#[derive(Debug, thiserror::Error)]
pub enum RwmapError {
    #[error("failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create shard {shard} at {path}: {source}")]
    CreateShard {
        shard: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write shard {shard} at {path}: {source}")]
    WriteShard {
        shard: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index could not resolve an alias generated from one of its own
    /// variants: enumeration and narrowing disagree.
    #[error("no variant of {name:?} matches alias {key} (template {template})")]
    NoMatch {
        name: String,
        key: String,
        template: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to spawn worker for shard {shard}: {source}")]
    SpawnWorker {
        shard: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("worker for shard {shard} panicked: {message}")]
    WorkerPanicked { shard: usize, message: String },
}
