use std::any::Any;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel as channel;
use rwmap_index::ManpageIndex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::RwmapError;
use crate::printer::print_name;
use crate::resolve::DEFAULT_SERVING_EXTENSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardOptions {
    /// Number of workers, and therefore shard files. Values below 1 are treated as 1.
    pub workers: usize,
    pub output_dir: PathBuf,
    pub serving_extension: String,
    /// Names buffered between the dispatcher and the workers.
    pub queue_capacity: usize,
}

impl Default for ShardOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            output_dir: PathBuf::from("."),
            serving_extension: DEFAULT_SERVING_EXTENSION.to_owned(),
            queue_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardReport {
    pub shard: usize,
    pub path: PathBuf,
    pub names: u64,
    pub lines: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub names: u64,
    pub lines: u64,
    pub shards: Vec<ShardReport>,
    pub elapsed_ms: u64,
}

pub fn shard_path(output_dir: &Path, shard: usize) -> PathBuf {
    output_dir.join(format!("output.{shard}"))
}

/// Writes the rewrite map for every name in `index` into
/// `options.workers` shard files.
///
/// Names are handed to the workers through a bounded queue; each worker owns
/// one `output.<n>` file. The first failure stops dispatch and the remaining
/// workers, and is returned once every worker has been joined.
pub fn write_shards<I>(index: &I, options: &ShardOptions) -> Result<RunReport, RwmapError>
where
    I: ManpageIndex + ?Sized,
{
    let started = Instant::now();
    let workers = options.workers.max(1);
    let output_dir = if options.output_dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        options.output_dir.as_path()
    };

    fs::create_dir_all(output_dir).map_err(|source| RwmapError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    // Create every shard before dispatching so an unwritable directory fails
    // before any work is done.
    let mut shards = Vec::with_capacity(workers);
    for shard in 0..workers {
        let path = shard_path(output_dir, shard);
        let file = File::create(&path).map_err(|source| RwmapError::CreateShard {
            shard,
            path: path.clone(),
            source,
        })?;
        shards.push(ShardWriter { shard, path, file });
    }

    let (tx, rx) = channel::bounded::<&str>(options.queue_capacity.max(1));
    let abort = AtomicBool::new(false);
    let extension = options.serving_extension.as_str();

    let (reports, failure) = thread::scope(|scope| {
        let mut failure = None;
        let mut handles = Vec::with_capacity(workers);
        for writer in shards {
            let shard = writer.shard;
            let rx = rx.clone();
            let abort = &abort;
            let spawned = thread::Builder::new()
                .name(format!("rwmap-shard-{shard}"))
                .spawn_scoped(scope, move || writer.run(index, extension, rx, abort));
            match spawned {
                Ok(handle) => handles.push((shard, handle)),
                Err(source) => {
                    abort.store(true, Ordering::Relaxed);
                    failure = Some(RwmapError::SpawnWorker { shard, source });
                    break;
                }
            }
        }
        drop(rx);

        if failure.is_none() {
            for name in index.names() {
                if abort.load(Ordering::Relaxed) {
                    break;
                }
                // Only fails once every worker has exited.
                if tx.send(name).is_err() {
                    break;
                }
            }
        }
        drop(tx);

        let mut reports = Vec::with_capacity(handles.len());
        for (shard, handle) in handles {
            match handle.join() {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(err)) => {
                    failure.get_or_insert(err);
                }
                Err(payload) => {
                    failure.get_or_insert(RwmapError::WorkerPanicked {
                        shard,
                        message: panic_message(payload.as_ref()),
                    });
                }
            }
        }
        (reports, failure)
    });

    if let Some(err) = failure {
        return Err(err);
    }

    let report = RunReport {
        names: reports.iter().map(|r| r.names).sum(),
        lines: reports.iter().map(|r| r.lines).sum(),
        shards: reports,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        target = "rwmap.shard",
        names = report.names,
        lines = report.lines,
        shards = report.shards.len(),
        elapsed_ms = report.elapsed_ms,
        output_dir = %output_dir.display(),
        "wrote rewrite map shards"
    );
    Ok(report)
}

struct ShardWriter {
    shard: usize,
    path: PathBuf,
    file: File,
}

impl ShardWriter {
    fn run<I: ManpageIndex + ?Sized>(
        self,
        index: &I,
        extension: &str,
        queue: channel::Receiver<&str>,
        abort: &AtomicBool,
    ) -> Result<ShardReport, RwmapError> {
        let Self { shard, path, file } = self;
        let _abort_on_panic = AbortOnPanic(abort);
        debug!(target = "rwmap.shard", shard, path = %path.display(), "shard worker started");

        let write_err = |source| RwmapError::WriteShard {
            shard,
            path: path.clone(),
            source,
        };

        let mut out = BufWriter::new(file);
        let mut names = 0u64;
        let mut lines = 0u64;
        for name in queue.iter() {
            if abort.load(Ordering::Relaxed) {
                break;
            }
            match print_name(index, name, extension, &mut out) {
                Ok(written) => {
                    names += 1;
                    lines += written as u64;
                }
                Err(err) => {
                    abort.store(true, Ordering::Relaxed);
                    return Err(match err {
                        RwmapError::Io(source) => write_err(source),
                        other => other,
                    });
                }
            }
        }

        if let Err(source) = out.flush() {
            abort.store(true, Ordering::Relaxed);
            return Err(write_err(source));
        }
        drop(out);

        debug!(target = "rwmap.shard", shard, names, lines, "shard worker finished");
        Ok(ShardReport {
            shard,
            path,
            names,
            lines,
        })
    }
}

/// Stops the other workers and the dispatcher if this worker unwinds.
struct AbortOnPanic<'a>(&'a AtomicBool);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::Relaxed);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
