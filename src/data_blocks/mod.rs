//! Data Blocks Module
//!
//! Locating, classifying and persisting the `0x67` data blocks embedded in a
//! VGM command stream.

pub mod classify;
pub mod scanner;
pub mod sink;


pub use classify::{chip_label, classify, Category, UNKNOWN_CHIP};
pub use scanner::{scan, BlockScanner, DataBlock, ScanStatus, BLOCK_MARKER, COMPAT_ESCAPE};
pub use sink::{artifact_name, DirectorySink, MemorySink, NullSink};
