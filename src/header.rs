use std::ops::Range;

use bytes::Buf;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::HeaderError;
use crate::utils::is_vgm;

/// Size of the fixed header block read before anything else
pub const VGM_HEADER_SIZE: usize = 0x40;
/// Position of the EOF offset field
pub const VGM_EOF_OFFSET: usize = 0x04;
/// Position of the (self-relative) data offset field
pub const VGM_DATA_OFFSET: usize = 0x34;

/// The part of the VGM header needed to locate the command stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    /// Raw value at 0x04 (total size minus 4)
    pub eof_offset_field: u32,
    /// Raw value at 0x34 (relative to 0x34, zero for pre-1.50 files)
    pub data_offset_field: u32,
}

impl FileHeader {
    /// Validate the first 64 bytes of a decoded VGM buffer.
    ///
    /// Only the magic, the EOF offset and the data offset are looked at; every
    /// other header field is ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self, HeaderError> {
        if data.len() < VGM_HEADER_SIZE {
            return Err(HeaderError::Truncated {
                available: data.len(),
            });
        }
        let mut header = &data[..VGM_HEADER_SIZE];

        let mut magic = [0u8; 4];
        header.copy_to_slice(&mut magic);
        if !is_vgm(&magic) {
            return Err(HeaderError::BadMagic { found: magic });
        }

        let eof_offset_field = header.get_u32_le();
        if eof_offset_field == 0 {
            return Err(HeaderError::MissingEofOffset);
        }

        header.advance(VGM_DATA_OFFSET - VGM_EOF_OFFSET - 4);
        let data_offset_field = header.get_u32_le();

        let parsed = FileHeader {
            eof_offset_field,
            data_offset_field,
        };
        debug!(
            eof_offset = eof_offset_field,
            data_offset = parsed.data_offset(),
            total_size = parsed.total_size(),
            "parsed VGM header"
        );
        Ok(parsed)
    }

    /// Absolute start of the command stream
    pub fn data_offset(&self) -> u64 {
        match self.data_offset_field {
            0 => VGM_HEADER_SIZE as u64,
            field => field as u64 + VGM_DATA_OFFSET as u64,
        }
    }

    /// File size declared by the header
    pub fn total_size(&self) -> u64 {
        self.eof_offset_field as u64 + 4
    }

    /// Length of the command stream, rejecting a data offset past the end
    pub fn command_stream_size(&self) -> Result<u64, HeaderError> {
        let data_offset = self.data_offset();
        let total_size = self.total_size();
        total_size
            .checked_sub(data_offset)
            .ok_or(HeaderError::InvalidSize {
                data_offset,
                total_size,
            })
    }

    /// Byte range of the command stream within the decoded file
    pub fn command_stream_range(&self) -> Result<Range<usize>, HeaderError> {
        self.command_stream_size()?;
        let data_offset = self.data_offset();
        let total_size = self.total_size();
        let invalid = || HeaderError::InvalidSize {
            data_offset,
            total_size,
        };
        let start = usize::try_from(data_offset).map_err(|_| invalid())?;
        let end = usize::try_from(total_size).map_err(|_| invalid())?;
        Ok(start..end)
    }
}
