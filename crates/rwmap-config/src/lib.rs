//! Configuration and logging setup for the rewrite-map generator.
//!
//! Settings come from an optional TOML file (every key defaulted) and are then
//! overridden by command-line flags:
//!
//! ```toml
//! index = "/srv/man/auxserver.idx"
//! concurrency = 8
//! output_dir = "/srv/man/rwmap"
//!
//! [logging]
//! level = "debug"
//! json = true
//! ```

use std::fs::OpenOptions;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Toml { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RwmapConfig {
    /// Index generated by the manpage renderer.
    #[serde(default = "RwmapConfig::default_index")]
    pub index: PathBuf,

    /// Number of shards written in parallel. Zero or negative selects the
    /// number of logical CPUs.
    #[serde(default)]
    pub concurrency: i64,

    /// Directory receiving `output.<n>` shard files.
    #[serde(default = "RwmapConfig::default_output_dir")]
    pub output_dir: PathBuf,

    /// Appended to every serving path.
    #[serde(default = "RwmapConfig::default_serving_extension")]
    pub serving_extension: String,

    /// Names buffered between the dispatcher and the shard workers.
    #[serde(default = "RwmapConfig::default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RwmapConfig {
    fn default_index() -> PathBuf {
        PathBuf::from("/srv/man/auxserver.idx")
    }

    fn default_output_dir() -> PathBuf {
        PathBuf::from(".")
    }

    fn default_serving_extension() -> String {
        ".html".to_owned()
    }

    fn default_queue_capacity() -> usize {
        256
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Toml {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Worker (and shard) count after applying the CPU-count default.
    pub fn effective_workers(&self) -> usize {
        match usize::try_from(self.concurrency) {
            Ok(workers) if workers > 0 => workers,
            _ => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl Default for RwmapConfig {
    fn default() -> Self {
        Self {
            index: Self::default_index(),
            concurrency: 0,
            output_dir: Self::default_output_dir(),
            serving_extension: Self::default_serving_extension(),
            queue_capacity: Self::default_queue_capacity(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Also append logs to this file. If it cannot be opened, file logging is
    /// skipped.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// Effective filter: the configured level merged with `RUST_LOG`, if set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber.
///
/// Safe to call more than once; only the first call has an effect. Logs never
/// go to stdout, which is reserved for command output.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let mut make_writer = if config.stderr {
            BoxMakeWriter::new(std::io::stderr)
        } else {
            BoxMakeWriter::new(std::io::sink)
        };
        if let Some(file) = config.file.as_ref().and_then(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        }) {
            make_writer = BoxMakeWriter::new(make_writer.and(Mutex::new(file)));
        }

        let registry = tracing_subscriber::registry().with(filter);
        let _ = if config.json {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(make_writer))
                .try_init()
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(make_writer),
                )
                .try_init()
        };
    });
}
