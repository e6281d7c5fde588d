use crate::errors::{VgmError, VgmResult};

/// Limits and policies for one extraction run
///
/// Every decode call gets its own copy; nothing here is shared between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Maximum number of blocks extracted before the scan stops
    pub max_blocks: usize,

    /// Maximum size of the decoded (decompressed) file in bytes
    pub max_file_size: usize,

    /// Keep scanning when a block cannot be persisted instead of failing fast
    pub continue_on_sink_error: bool,

    /// Inflate files starting with the gzip magic even without a .vgz extension
    pub sniff_gzip_magic: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_blocks: 1000,
            max_file_size: 64 * 1024 * 1024, // 64MB
            continue_on_sink_error: false,
            sniff_gzip_magic: false,
        }
    }
}

impl ExtractorConfig {
    /// Tighter limits for untrusted input
    pub fn strict() -> Self {
        Self {
            max_blocks: 256,
            max_file_size: 16 * 1024 * 1024, // 16MB
            continue_on_sink_error: false,
            sniff_gzip_magic: false,
        }
    }

    /// Room for large arcade dumps with many ROM blocks
    pub fn permissive() -> Self {
        Self {
            max_blocks: 10_000,
            max_file_size: 256 * 1024 * 1024, // 256MB
            continue_on_sink_error: false,
            sniff_gzip_magic: true,
        }
    }

    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    pub fn with_continue_on_sink_error(mut self, keep_going: bool) -> Self {
        self.continue_on_sink_error = keep_going;
        self
    }

    pub fn with_sniff_gzip_magic(mut self, sniff: bool) -> Self {
        self.sniff_gzip_magic = sniff;
        self
    }

    /// Reject settings that can never produce a useful run
    pub fn validate(&self) -> VgmResult<()> {
        if self.max_blocks == 0 {
            return Err(VgmError::InvalidConfig {
                field: "max_blocks".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.max_file_size < crate::header::VGM_HEADER_SIZE {
            return Err(VgmError::InvalidConfig {
                field: "max_file_size".to_string(),
                reason: format!(
                    "{} bytes cannot hold a {} byte header",
                    self.max_file_size,
                    crate::header::VGM_HEADER_SIZE
                ),
            });
        }

        Ok(())
    }

    /// Check a decoded file against `max_file_size`
    pub fn check_file_size(&self, size: usize) -> VgmResult<()> {
        if size > self.max_file_size {
            return Err(VgmError::DataSizeExceedsLimit {
                field: "decompressed_file_size".to_string(),
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }
}
