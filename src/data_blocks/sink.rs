//! Block Persistence
//!
//! Sinks receive each extracted payload together with its scan index.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::IoError;
use crate::traits::BlockSink;
use crate::utils::reserve_buffer;

/// Artifact name for the block at `index`
pub fn artifact_name(index: usize) -> String {
    format!("block_{}.raw", index)
}

/// Write the whole payload, reporting how far a failing writer got
pub fn write_payload<W: Write>(writer: &mut W, path: &Path, payload: &[u8]) -> Result<(), IoError> {
    let mut written = 0;
    while written < payload.len() {
        match writer.write(&payload[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(path = %path.display(), written, error = %e, "write failed");
                return Err(IoError::WriteFailed {
                    path: path.display().to_string(),
                    written,
                    expected: payload.len(),
                    reason: e.to_string(),
                });
            },
        }
    }

    if written != payload.len() {
        return Err(IoError::ShortWrite {
            path: path.display().to_string(),
            written,
            expected: payload.len(),
        });
    }
    Ok(())
}

/// Writes `block_<index>.raw` files into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    create_dir: bool,
}

impl DirectorySink {
    /// Sink into an existing directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            create_dir: false,
        }
    }

    /// Create the directory (and parents) before the first write
    pub fn creating(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            create_dir: true,
        }
    }

    /// Where the block at `index` ends up
    pub fn artifact_path(&self, index: usize) -> PathBuf {
        self.dir.join(artifact_name(index))
    }
}

impl BlockSink for DirectorySink {
    fn persist(&mut self, index: usize, payload: &[u8]) -> Result<(), IoError> {
        if self.create_dir {
            std::fs::create_dir_all(&self.dir).map_err(|e| IoError::open_failed(&self.dir, &e))?;
            self.create_dir = false;
        }

        let path = self.artifact_path(index);
        let mut file = File::create(&path).map_err(|e| IoError::open_failed(&path, &e))?;
        write_payload(&mut file, &path, payload)?;
        debug!(path = %path.display(), size = payload.len(), "saved block");
        Ok(())
    }
}

/// Keeps payloads in memory instead of writing files
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub blocks: Vec<(usize, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.blocks
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, data)| data.as_slice())
    }
}

impl BlockSink for MemorySink {
    fn persist(&mut self, index: usize, payload: &[u8]) -> Result<(), IoError> {
        let mut data = reserve_buffer(payload.len(), || format!("{} payload", artifact_name(index)))?;
        data.extend_from_slice(payload);
        self.blocks.push((index, data));
        Ok(())
    }
}

/// Discards payloads; used for listing a file's blocks
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl BlockSink for NullSink {
    fn persist(&mut self, _index: usize, _payload: &[u8]) -> Result<(), IoError> {
        Ok(())
    }
}
