use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;

use crate::errors::IoError;

/// Gzip magic bytes (RFC 1952)
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// VGM magic bytes
pub const VGM_MAGIC: [u8; 4] = [0x56, 0x67, 0x6d, 0x20]; // "Vgm "

/// Extensions that mark a gzip container
pub const COMPRESSED_EXTENSIONS: [&str; 2] = ["vgz", "gz"];

/// Detect if data is gzipped by checking magic bytes
pub fn is_gzipped(data: &[u8]) -> bool {
    data.len() >= 2 && data[0..2] == GZIP_MAGIC
}

/// Detect if data is a VGM file by checking magic bytes
pub fn is_vgm(data: &[u8]) -> bool {
    data.len() >= 4 && data[0..4] == VGM_MAGIC
}

/// Whether the extension of `path` says the file is gzip compressed
pub fn has_compressed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            COMPRESSED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Empty buffer with room for `size` bytes, failing instead of aborting
pub fn reserve_buffer<F>(size: usize, purpose: F) -> Result<Vec<u8>, IoError>
where
    F: FnOnce() -> String,
{
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| IoError::AllocationFailed {
            size,
            purpose: purpose(),
        })?;
    Ok(buffer)
}

/// Decompress gzipped data read from `path`
pub fn decompress_gzip(path: &Path, compressed_data: &[u8]) -> Result<Vec<u8>, IoError> {
    if !is_gzipped(compressed_data) {
        return Err(IoError::Decompression {
            path: path.display().to_string(),
            reason: "data does not have valid gzip magic bytes".to_string(),
        });
    }

    let mut decoder = GzDecoder::new(compressed_data);
    let mut decompressed = Vec::new();

    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| IoError::Decompression {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    Ok(decompressed)
}
