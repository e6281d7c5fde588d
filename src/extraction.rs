use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data_blocks::{artifact_name, classify, Category, DataBlock, ScanStatus};
use crate::header::FileHeader;

/// What is kept of a block once its payload has been handed to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub index: usize,
    pub type_code: u8,
    pub payload_size: u32,
    pub category: Category,
    pub chip: String,
    /// `block_<index>.raw`
    pub artifact: String,
    /// Marker position within the command stream
    pub offset: usize,
    pub compat: bool,
}

impl BlockSummary {
    pub fn new(index: usize, block: &DataBlock) -> Self {
        let (category, chip) = classify(block.type_code);
        Self {
            index,
            type_code: block.type_code,
            payload_size: block.payload_size,
            category,
            chip: chip.to_string(),
            artifact: artifact_name(index),
            offset: block.offset,
            compat: block.compat,
        }
    }
}

impl fmt::Display for BlockSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}, {} bytes)",
            self.artifact, self.category, self.chip, self.payload_size
        )
    }
}

/// A block that was found but could not be persisted (soft sink policy only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkFailure {
    pub index: usize,
    pub message: String,
}

/// Outcome of extracting one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Path the bytes came from, `None` for in-memory input
    pub source: Option<String>,
    pub header: FileHeader,
    pub command_stream_size: u64,
    /// Persisted blocks in file order
    pub blocks: Vec<BlockSummary>,
    pub status: ScanStatus,
    pub sink_failures: Vec<SinkFailure>,
}

impl ExtractionResult {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.status == ScanStatus::CapacityExceeded
    }

    pub fn total_payload_bytes(&self) -> u64 {
        self.blocks.iter().map(|b| b.payload_size as u64).sum()
    }

    /// One line per block, e.g. `block_0.raw: ROM/RAM image dumps (...)`
    pub fn listing(&self) -> Vec<String> {
        self.blocks.iter().map(|b| b.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(type_code: u8, size: u32) -> DataBlock {
        DataBlock {
            offset: 12,
            type_code,
            payload_size: size,
            payload: vec![0; size as usize],
            compat: true,
        }
    }

    #[test]
    fn test_summary_from_block() {
        let summary = BlockSummary::new(4, &block(0x8B, 100));
        assert_eq!(summary.index, 4);
        assert_eq!(summary.category, Category::RomRamDump);
        assert_eq!(summary.chip, "OKIM6295 ROM");
        assert_eq!(summary.artifact, "block_4.raw");
        assert_eq!(summary.offset, 12);
        assert!(summary.compat);
        assert_eq!(
            summary.to_string(),
            "block_4.raw: ROM/RAM image dumps (OKIM6295 ROM, 100 bytes)"
        );
    }

    #[test]
    fn test_result_helpers() {
        let result = ExtractionResult {
            source: None,
            header: FileHeader {
                eof_offset_field: 0x100,
                data_offset_field: 0,
            },
            command_stream_size: 0xC4,
            blocks: vec![
                BlockSummary::new(0, &block(0x00, 10)),
                BlockSummary::new(1, &block(0xF0, 20)),
            ],
            status: ScanStatus::CapacityExceeded,
            sink_failures: vec![],
        };

        assert_eq!(result.block_count(), 2);
        assert!(result.is_truncated());
        assert_eq!(result.total_payload_bytes(), 30);

        let listing = result.listing();
        assert_eq!(listing.len(), 2);
        assert!(listing[0].starts_with("block_0.raw: uncompressed recorded streams"));
        assert_eq!(listing[1], "block_1.raw: RAM writes (> 64 KB) (unknown, 20 bytes)");
    }

    #[test]
    fn test_result_serializes_to_json() {
        let result = ExtractionResult {
            source: Some("song.vgz".to_string()),
            header: FileHeader {
                eof_offset_field: 0x200,
                data_offset_field: 0x0C,
            },
            command_stream_size: 0x1C4,
            blocks: vec![BlockSummary::new(0, &block(0x81, 8))],
            status: ScanStatus::Complete,
            sink_failures: vec![],
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"artifact\":\"block_0.raw\""));
        assert!(json.contains("\"status\":\"Complete\""));

        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
