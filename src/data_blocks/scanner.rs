//! Command Stream Scanner
//!
//! Walks a VGM command stream byte by byte and pulls out every data block
//! (`0x67`) it can bounds-check. Other command bytes are not interpreted.

use bytes::Buf;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::IoError;
use crate::utils::reserve_buffer;

/// Command byte introducing a data block
pub const BLOCK_MARKER: u8 = 0x67;
/// Type byte value that escapes the real type (compatibility mode)
pub const COMPAT_ESCAPE: u8 = 0x66;
/// Bytes of the declared size that are not payload
pub const INLINE_HEADER_SIZE: u32 = 8;
/// Bit 31 of the size field is a flag, not magnitude
pub const SIZE_MASK: u32 = 0x7FFF_FFFF;
/// A marker needs this many bytes after it to be read as a block header
const MIN_HEADER_LOOKAHEAD: usize = 7;

/// One extracted data block, owning its payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataBlock {
    /// Position of the `0x67` marker in the command stream
    pub offset: usize,
    pub type_code: u8,
    /// Masked size minus the 8 inline header bytes
    pub payload_size: u32,
    pub payload: Vec<u8>,
    /// The type byte was escaped with `0x66`
    pub compat: bool,
}

/// How a scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanStatus {
    /// Reached the end of the stream
    Complete,
    /// Stopped early because the block limit was hit; found blocks stay valid
    CapacityExceeded,
}

/// Streaming form of [`scan`], yielding blocks in file order.
///
/// A payload that cannot be allocated is yielded as an error and ends the
/// iteration; `status()` then stays `None`.
#[derive(Debug)]
pub struct BlockScanner<'a> {
    stream: &'a [u8],
    pos: usize,
    max_blocks: usize,
    emitted: usize,
    status: Option<ScanStatus>,
    failed: bool,
}

impl<'a> BlockScanner<'a> {
    pub fn new(stream: &'a [u8], max_blocks: usize) -> Self {
        let status = (max_blocks == 0).then_some(ScanStatus::CapacityExceeded);
        Self {
            stream,
            pos: 0,
            max_blocks,
            emitted: 0,
            status,
            failed: false,
        }
    }

    /// Final status, `None` while the scan is still running
    pub fn status(&self) -> Option<ScanStatus> {
        self.status
    }

    /// Number of blocks yielded so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Try to read a block header at `self.pos`, which holds a marker.
    ///
    /// Returns the block when one is emitted. The cursor is always moved
    /// past whatever was consumed.
    fn read_block(&mut self) -> Result<Option<DataBlock>, IoError> {
        let stream = self.stream;
        let marker = self.pos;
        let mut cursor = marker + 1;

        let mut type_code = stream[cursor];
        cursor += 1;
        let compat = type_code == COMPAT_ESCAPE;
        if compat {
            type_code = stream[cursor];
            cursor += 1;
        }

        let size = (&stream[cursor..cursor + 4]).get_u32_le() & SIZE_MASK;
        cursor += 4;

        let block_end = match cursor.checked_add(size as usize) {
            Some(end) if end <= stream.len() => end,
            _ => {
                trace!(
                    offset = marker,
                    size,
                    remaining = stream.len() - cursor,
                    "declared block size runs past end of stream, skipping marker"
                );
                self.pos = marker + 1;
                return Ok(None);
            },
        };
        self.pos = block_end;

        if size <= INLINE_HEADER_SIZE {
            trace!(offset = marker, type_code, size, "header-only block");
            return Ok(None);
        }

        let payload_size = size - INLINE_HEADER_SIZE;
        let len = payload_size as usize;
        let mut payload = reserve_buffer(len, || format!("data block at stream offset 0x{:X}", marker))?;
        payload.extend_from_slice(&stream[cursor..cursor + len]);
        Ok(Some(DataBlock {
            offset: marker,
            type_code,
            payload_size,
            payload,
            compat,
        }))
    }
}

impl Iterator for BlockScanner<'_> {
    type Item = Result<DataBlock, IoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.status.is_some() || self.failed {
            return None;
        }

        while self.pos < self.stream.len() {
            let is_header = self.stream[self.pos] == BLOCK_MARKER
                && self.pos + MIN_HEADER_LOOKAHEAD < self.stream.len();
            if !is_header {
                self.pos += 1;
                continue;
            }

            match self.read_block() {
                Ok(Some(block)) => {
                    self.emitted += 1;
                    if self.emitted >= self.max_blocks {
                        self.status = Some(ScanStatus::CapacityExceeded);
                    }
                    return Some(Ok(block));
                },
                Ok(None) => {},
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                },
            }
        }

        self.status = Some(ScanStatus::Complete);
        None
    }
}

/// Extract every data block of `stream`, stopping after `max_blocks`.
///
/// Malformed block headers are skipped, never reported as errors. The only
/// failure is a payload buffer that cannot be allocated.
pub fn scan(stream: &[u8], max_blocks: usize) -> Result<(Vec<DataBlock>, ScanStatus), IoError> {
    let mut scanner = BlockScanner::new(stream, max_blocks);
    let blocks = scanner.by_ref().collect::<Result<Vec<_>, _>>()?;
    let status = scanner.status().unwrap_or(ScanStatus::Complete);
    Ok((blocks, status))
}
