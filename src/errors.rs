use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Failures while validating the fixed-layout VGM header
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The first four bytes are not `"Vgm "`
    #[error("Invalid VGM magic bytes: expected 'Vgm ', found {found:02X?}")]
    BadMagic { found: [u8; 4] },

    /// The EOF offset field at 0x04 is zero
    #[error("Invalid EOF offset in header: field at 0x04 is zero")]
    MissingEofOffset,

    /// The data section starts after the declared end of file
    #[error("Invalid command stream size: data offset 0x{data_offset:X} is past total size 0x{total_size:X}")]
    InvalidSize { data_offset: u64, total_size: u64 },

    /// Fewer than 64 bytes were available for the header
    #[error("VGM header truncated: {available} bytes available, 64 required")]
    Truncated { available: usize },
}

/// Failures at the file boundary (reading sources, writing artifacts)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IoError {
    #[error("Error opening file \"{path}\": {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("Short read from {path}: expected {expected} bytes, got {actual}")]
    ShortRead {
        path: String,
        expected: usize,
        actual: usize,
    },

    #[error("Error writing {path}: wrote {written} of {expected} bytes (out of space?)")]
    ShortWrite {
        path: String,
        written: usize,
        expected: usize,
    },

    #[error("Error writing {path}: {reason} after {written} of {expected} bytes")]
    WriteFailed {
        path: String,
        written: usize,
        expected: usize,
        reason: String,
    },

    #[error("Memory allocation failed: attempted to allocate {size} bytes for {purpose}")]
    AllocationFailed { size: usize, purpose: String },

    #[error("Failed to decompress {path}: {reason}")]
    Decompression { path: String, reason: String },
}

impl IoError {
    /// Map an `std::io::Error` raised while opening or reading `path`
    pub fn open_failed(path: &Path, err: &std::io::Error) -> Self {
        IoError::OpenFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Top level error for an extraction run
///
/// Header and I/O failures abort the decode of a file. Each variant carries a
/// machine-readable code and a category so front ends can group them without
/// matching on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VgmError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Io(#[from] IoError),

    /// Data size exceeds the configured limit
    #[error("Data size exceeds limit for {field}: {size} bytes (limit: {limit})")]
    DataSizeExceedsLimit {
        field: String,
        size: usize,
        limit: usize,
    },

    /// Extractor configuration rejected before any work started
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl VgmError {
    /// Get the error code for machine-readable processing
    pub fn code(&self) -> u16 {
        match self {
            // I/O Errors (1000-1099)
            Self::Io(IoError::OpenFailed { .. }) => 1001,
            Self::Io(IoError::ShortRead { .. }) => 1002,
            Self::Io(IoError::ShortWrite { .. }) => 1003,
            Self::Io(IoError::Decompression { .. }) => 1004,
            Self::Io(IoError::WriteFailed { .. }) => 1005,

            // Format Validation Errors (2000-2099)
            Self::Header(HeaderError::BadMagic { .. }) => 2001,
            Self::Header(HeaderError::MissingEofOffset) => 2002,
            Self::Header(HeaderError::InvalidSize { .. }) => 2003,
            Self::Header(HeaderError::Truncated { .. }) => 2004,

            // Memory and Resource Errors (6000-6099)
            Self::Io(IoError::AllocationFailed { .. }) => 6001,
            Self::DataSizeExceedsLimit { .. } => 6003,

            // Configuration Errors (7000-7099)
            Self::InvalidConfig { .. } => 7001,
        }
    }

    /// Get the error category for grouping related errors
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            1000..=1099 => ErrorCategory::IO,
            2000..=2099 => ErrorCategory::FormatValidation,
            6000..=6099 => ErrorCategory::MemoryResource,
            7000..=7099 => ErrorCategory::Configuration,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether other files of the same batch can still be processed.
    ///
    /// Only write-side failures (the output location is broken) make the rest
    /// of a batch pointless.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Io(IoError::ShortWrite { .. })
                | Self::Io(IoError::WriteFailed { .. })
                | Self::InvalidConfig { .. }
        )
    }

    /// Get suggested action for handling this error
    pub fn suggested_action(&self) -> &'static str {
        match self {
            Self::Io(IoError::OpenFailed { .. }) => "Check file path and permissions",
            Self::Io(IoError::ShortWrite { .. }) | Self::Io(IoError::WriteFailed { .. }) => "Free disk space or choose another output directory",
            Self::Io(IoError::Decompression { .. }) => "File is not a valid gzip stream; try the plain .vgm",
            Self::Header(HeaderError::BadMagic { .. }) => "Verify this is a valid VGM file",
            Self::Header(HeaderError::InvalidSize { .. })
            | Self::Header(HeaderError::MissingEofOffset) => "Header offsets are corrupted",
            Self::DataSizeExceedsLimit { .. } => "Raise the size limit or use the permissive preset",
            _ => "Check file integrity and VGM specification compliance",
        }
    }
}

/// Error categories for grouping related error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    IO,
    FormatValidation,
    MemoryResource,
    Configuration,
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IO => write!(f, "I/O"),
            Self::FormatValidation => write!(f, "Format Validation"),
            Self::MemoryResource => write!(f, "Memory/Resource"),
            Self::Configuration => write!(f, "Configuration"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result type alias for VGM operations
pub type VgmResult<T> = Result<T, VgmError>;
