pub mod data_blocks;
pub mod errors;
pub mod extraction;
pub mod extractor_config;
pub mod header;
pub mod source;
pub mod traits;
pub mod utils;

pub use data_blocks::*;
pub use errors::*;
pub use extraction::*;
pub use extractor_config::*;
pub use header::*;
pub use source::*;
pub use traits::*;

use std::path::Path;

use tracing::{info, warn};

/// Label used in errors for buffers that did not come from a file
const IN_MEMORY: &str = "<memory>";

/// Extracts the data blocks of VGM/VGZ files
///
/// Each call owns its buffer, block list and result, so one extractor can be
/// used for any number of files.
#[derive(Debug, Clone, Default)]
pub struct VgmExtractor {
    config: ExtractorConfig,
}

impl VgmExtractor {
    /// Extractor with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor with custom limits and policies
    pub fn with_config(config: ExtractorConfig) -> VgmResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Byte source matching the configured gzip detection
    pub fn default_source(&self) -> FileSource {
        if self.config.sniff_gzip_magic {
            FileSource::sniffing()
        } else {
            FileSource::new()
        }
    }

    /// Read `path` from disk and write its blocks as `block_<i>.raw` into `out_dir`
    pub fn extract_file(&self, path: &Path, out_dir: &Path) -> VgmResult<ExtractionResult> {
        let mut sink = DirectorySink::creating(out_dir);
        self.extract_path(path, &self.default_source(), &mut sink)
    }

    /// Read `path` through `source` and hand every block to `sink`
    pub fn extract_path<B, S>(&self, path: &Path, source: &B, sink: &mut S) -> VgmResult<ExtractionResult>
    where
        B: ByteSource + ?Sized,
        S: BlockSink + ?Sized,
    {
        let label = path.display().to_string();
        let data = source.read(path)?;
        let mut result = self.extract_labeled(&data, &label, sink)?;
        result.source = Some(label);
        Ok(result)
    }

    /// Extract from an already decoded buffer
    pub fn extract_bytes<S>(&self, data: &[u8], sink: &mut S) -> VgmResult<ExtractionResult>
    where
        S: BlockSink + ?Sized,
    {
        self.extract_labeled(data, IN_MEMORY, sink)
    }

    /// Scan a decoded buffer and summarize its blocks without persisting anything
    pub fn list_blocks(&self, data: &[u8]) -> VgmResult<ExtractionResult> {
        self.extract_bytes(data, &mut NullSink)
    }

    fn extract_labeled<S>(&self, data: &[u8], label: &str, sink: &mut S) -> VgmResult<ExtractionResult>
    where
        S: BlockSink + ?Sized,
    {
        self.config.check_file_size(data.len())?;

        let header = FileHeader::from_bytes(data).map_err(|e| match e {
            HeaderError::Truncated { available } => VgmError::Io(IoError::ShortRead {
                path: label.to_string(),
                expected: VGM_HEADER_SIZE,
                actual: available,
            }),
            other => VgmError::Header(other),
        })?;

        let stream_size = header.command_stream_size()?;
        if header.total_size() > data.len() as u64 {
            let start = usize::try_from(header.data_offset()).unwrap_or(usize::MAX);
            return Err(IoError::ShortRead {
                path: label.to_string(),
                expected: usize::try_from(stream_size).unwrap_or(usize::MAX),
                actual: data.len().saturating_sub(start),
            }
            .into());
        }
        let stream = &data[header.command_stream_range()?];

        let mut scanner = BlockScanner::new(stream, self.config.max_blocks);
        let mut blocks = Vec::new();
        let mut sink_failures = Vec::new();

        for (index, block) in scanner.by_ref().enumerate() {
            let block = block?;
            let summary = BlockSummary::new(index, &block);
            match sink.persist(index, &block.payload) {
                Ok(()) => blocks.push(summary),
                Err(e) if self.config.continue_on_sink_error => {
                    warn!(source = label, index, error = %e, "failed to save block, continuing");
                    sink_failures.push(SinkFailure {
                        index,
                        message: e.to_string(),
                    });
                },
                Err(e) => return Err(e.into()),
            }
        }

        let status = scanner.status().unwrap_or(ScanStatus::Complete);
        if status == ScanStatus::CapacityExceeded {
            warn!(
                source = label,
                max_blocks = self.config.max_blocks,
                "block limit reached, remaining stream not scanned"
            );
        }
        info!(
            source = label,
            blocks = blocks.len(),
            failed = sink_failures.len(),
            stream_size = stream.len(),
            "extraction finished"
        );

        Ok(ExtractionResult {
            source: None,
            header,
            command_stream_size: stream.len() as u64,
            blocks,
            status,
            sink_failures,
        })
    }
}
