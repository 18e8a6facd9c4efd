use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::index::{Index, IndexData};

pub const INDEX_MAGIC: [u8; 8] = *b"RWMAPIDX";
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Upper bound for index files we are willing to read into memory.
///
/// Production indexes are tens of megabytes; a corrupt or mistaken path
/// should fail loudly rather than exhaust memory.
pub const INDEX_PAYLOAD_LIMIT_BYTES: usize = 1024 * 1024 * 1024;

#[derive(Debug, Serialize)]
struct IndexFile<'a> {
    magic: [u8; 8],
    format_version: u32,
    payload: &'a IndexData,
}

#[derive(Debug, Deserialize)]
struct IndexFileOwned {
    magic: [u8; 8],
    format_version: u32,
    payload: IndexData,
}

fn bincode_options() -> impl bincode::Options + Copy {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

/// Loads and validates an index.
///
/// Files starting with [`INDEX_MAGIC`] are decoded as the binary format written
/// by [`save_index`]; anything else is parsed as JSON [`IndexData`].
pub fn load_index(path: &Path) -> Result<Index> {
    let bytes = read_file_limited(path)?;

    let data = if bytes.starts_with(&INDEX_MAGIC) {
        decode_binary(&bytes)?
    } else {
        serde_json::from_slice::<IndexData>(&bytes).map_err(|err| IndexError::Json {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?
    };

    let index = Index::new(data)?;
    tracing::info!(
        target = "rwmap.index",
        path = %path.display(),
        names = index.name_count(),
        variants = index.variant_count(),
        suite_aliases = index.data().suites.len(),
        "loaded index"
    );
    Ok(index)
}

/// Writes `index` in the binary format, replacing `path` atomically.
pub fn save_index(path: &Path, index: &Index) -> Result<()> {
    let file = IndexFile {
        magic: INDEX_MAGIC,
        format_version: INDEX_FORMAT_VERSION,
        payload: index.data(),
    };
    let bytes = bincode_options().serialize(&file)?;
    atomic_write(path, &bytes)
}

fn decode_binary(bytes: &[u8]) -> Result<IndexData> {
    let file: IndexFileOwned = bincode_options()
        .with_limit(INDEX_PAYLOAD_LIMIT_BYTES as u64)
        .deserialize(bytes)?;
    debug_assert_eq!(file.magic, INDEX_MAGIC);
    if file.format_version != INDEX_FORMAT_VERSION {
        return Err(IndexError::UnsupportedFormatVersion {
            expected: INDEX_FORMAT_VERSION,
            found: file.format_version,
        });
    }
    Ok(file.payload)
}

fn read_file_limited(path: &Path) -> Result<Vec<u8>> {
    let read_err = |source: io::Error| IndexError::Read {
        path: path.to_path_buf(),
        source,
    };

    let meta = fs::metadata(path).map_err(read_err)?;
    if !meta.is_file() {
        return Err(IndexError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let limit = INDEX_PAYLOAD_LIMIT_BYTES as u64;
    if meta.len() > limit {
        return Err(IndexError::TooLarge {
            path: path.to_path_buf(),
            len: meta.len(),
            limit,
        });
    }

    fs::read(path).map_err(read_err)
}

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Err(io::Error::other("path has no parent").into());
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    fs::create_dir_all(parent)?;

    let (tmp_path, mut file) = open_unique_tmp_file(path, parent)?;
    let written = file.write_all(bytes).and_then(|()| file.sync_all());
    drop(file);
    let renamed = written.and_then(|()| fs::rename(&tmp_path, path));

    if let Err(err) = renamed {
        if let Err(remove_err) = fs::remove_file(&tmp_path) {
            if remove_err.kind() != io::ErrorKind::NotFound {
                tracing::debug!(
                    target = "rwmap.index",
                    path = %tmp_path.display(),
                    error = %remove_err,
                    "failed to remove temporary index file"
                );
            }
        }
        return Err(err.into());
    }
    Ok(())
}

fn open_unique_tmp_file(dest: &Path, parent: &Path) -> io::Result<(PathBuf, fs::File)> {
    let file_name = dest
        .file_name()
        .ok_or_else(|| io::Error::other("destination path has no file name"))?;
    let pid = std::process::id();

    loop {
        let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(format!(".tmp.{pid}.{counter}"));
        let tmp_path = parent.join(tmp_name);

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
        {
            Ok(file) => return Ok((tmp_path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
}
