//! Byte Source Module
//!
//! Turns a path into the decoded VGM bytes. Gzip containers (VGZ) are
//! inflated here so nothing downstream ever sees compressed data.

use std::path::Path;

use tracing::debug;

use crate::errors::IoError;
use crate::traits::ByteSource;
use crate::utils::{decompress_gzip, has_compressed_extension, is_gzipped};

/// Reads from the local filesystem, inflating VGZ files
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource {
    sniff_magic: bool,
}

impl FileSource {
    /// Decide on compression by file extension only
    pub fn new() -> Self {
        Self::default()
    }

    /// Also inflate files that start with the gzip magic, whatever their extension
    pub fn sniffing() -> Self {
        Self { sniff_magic: true }
    }

    fn wants_gzip(&self, path: &Path, raw: &[u8]) -> bool {
        has_compressed_extension(path) || (self.sniff_magic && is_gzipped(raw))
    }
}

impl ByteSource for FileSource {
    fn read(&self, path: &Path) -> Result<Vec<u8>, IoError> {
        let raw = std::fs::read(path).map_err(|e| IoError::open_failed(path, &e))?;

        if self.wants_gzip(path, &raw) {
            let inflated = decompress_gzip(path, &raw)?;
            debug!(
                path = %path.display(),
                compressed = raw.len(),
                decompressed = inflated.len(),
                "inflated gzip container"
            );
            return Ok(inflated);
        }

        debug!(path = %path.display(), size = raw.len(), "read raw file");
        Ok(raw)
    }
}
