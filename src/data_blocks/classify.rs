//! Data Block Classification
//!
//! Maps a block type byte to its category range and the sound chip the block
//! is meant for.

use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label reported for type codes missing from the chip table
pub const UNKNOWN_CHIP: &str = "unknown";

/// Block category, decided purely by the numeric range of the type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    UncompressedStream, // 0x00-0x3F
    CompressedStream,   // 0x40-0x7E
    DecompressionTable, // 0x7F
    RomRamDump,         // 0x80-0xBF
    RamWriteSmall,      // 0xC0-0xDF
    RamWriteLarge,      // 0xE0-0xFF
}

impl Category {
    pub fn from_type_code(type_code: u8) -> Self {
        match type_code {
            0x00..=0x3F => Category::UncompressedStream,
            0x40..=0x7E => Category::CompressedStream,
            0x7F => Category::DecompressionTable,
            0x80..=0xBF => Category::RomRamDump,
            0xC0..=0xDF => Category::RamWriteSmall,
            0xE0..=0xFF => Category::RamWriteLarge,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::UncompressedStream => "uncompressed recorded streams",
            Category::CompressedStream => "compressed recorded streams",
            Category::DecompressionTable => "decompression table",
            Category::RomRamDump => "ROM/RAM image dumps",
            Category::RamWriteSmall => "RAM writes (<= 64 KB)",
            Category::RamWriteLarge => "RAM writes (> 64 KB)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Chip label per full type code. Stream types repeat for the compressed range.
static CHIP_LABELS: phf::Map<u8, &'static str> = phf_map! {
    // Uncompressed streams
    0x00u8 => "YM2612 PCM",
    0x01u8 => "RF5C68 PCM",
    0x02u8 => "RF5C164 PCM",
    0x03u8 => "PWM PCM",
    0x04u8 => "OKIM6258 ADPCM",
    0x05u8 => "HuC6280 PCM",
    0x06u8 => "SCSP PCM",
    0x07u8 => "NES APU DPCM",
    0x08u8 => "Mikey PCM",
    // Compressed streams
    0x40u8 => "YM2612 PCM",
    0x41u8 => "RF5C68 PCM",
    0x42u8 => "RF5C164 PCM",
    0x43u8 => "PWM PCM",
    0x44u8 => "OKIM6258 ADPCM",
    0x45u8 => "HuC6280 PCM",
    0x46u8 => "SCSP PCM",
    0x47u8 => "NES APU DPCM",
    0x48u8 => "Mikey PCM",
    // Decompression table
    0x7Fu8 => "decompression table",
    // ROM/RAM dumps
    0x80u8 => "Sega PCM ROM",
    0x81u8 => "YM2608 DELTA-T ROM",
    0x82u8 => "YM2610 ADPCM ROM",
    0x83u8 => "YM2610 DELTA-T ROM",
    0x84u8 => "YMF278B ROM",
    0x85u8 => "YMF271 ROM",
    0x86u8 => "YMZ280B ROM",
    0x87u8 => "YMF278B RAM",
    0x88u8 => "Y8950 DELTA-T ROM",
    0x89u8 => "MultiPCM ROM",
    0x8Au8 => "uPD7759 ROM",
    0x8Bu8 => "OKIM6295 ROM",
    0x8Cu8 => "K054539 ROM",
    0x8Du8 => "C140 ROM",
    0x8Eu8 => "K053260 ROM",
    0x8Fu8 => "Q-Sound ROM",
    0x90u8 => "ES5505/ES5506 ROM",
    0x91u8 => "X1-010 ROM",
    0x92u8 => "C352 ROM",
    0x93u8 => "GA20 ROM",
    // RAM writes <= 64KB
    0xC0u8 => "RF5C68 RAM",
    0xC1u8 => "RF5C164 RAM",
    0xC2u8 => "NES APU RAM",
    // RAM writes > 64KB
    0xE0u8 => "SCSP RAM",
    0xE1u8 => "ES5503 RAM",
};

/// Chip label for a type code, `"unknown"` when the table has no entry
pub fn chip_label(type_code: u8) -> &'static str {
    CHIP_LABELS.get(&type_code).copied().unwrap_or(UNKNOWN_CHIP)
}

/// Classify a block type. Never fails.
pub fn classify(type_code: u8) -> (Category, &'static str) {
    (Category::from_type_code(type_code), chip_label(type_code))
}
