//! VGM Test Data Builders
//!
//! Builds synthetic VGM files with embedded data blocks. Only the header
//! fields the extractor reads are filled in; everything else stays zero.

#![allow(dead_code)]

use flate2::{write::GzEncoder, Compression};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Bytes the declared block size counts past the payload
pub const BLOCK_TRAILER: [u8; 8] = [0x62; 8];

/// Main builder for creating VGM test files with fluent API
#[derive(Debug, Clone)]
pub struct VgmBuilder {
    data_offset_field: u32,
    eof_override: Option<u32>,
    magic: [u8; 4],
    commands: CommandsBuilder,
}

impl Default for VgmBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VgmBuilder {
    /// Legacy layout: data offset field zero, stream right after the header
    pub fn new() -> Self {
        Self {
            data_offset_field: 0,
            eof_override: None,
            magic: *b"Vgm ",
            commands: CommandsBuilder::default(),
        }
    }

    /// Put the stream at `0x34 + field`, padding the header as needed
    pub fn data_offset_field(mut self, field: u32) -> Self {
        self.data_offset_field = field;
        self
    }

    /// Force a specific EOF offset instead of the computed one
    pub fn eof_offset(mut self, eof: u32) -> Self {
        self.eof_override = Some(eof);
        self
    }

    pub fn magic(mut self, magic: &[u8; 4]) -> Self {
        self.magic = *magic;
        self
    }

    /// Configure commands
    pub fn commands<F>(mut self, f: F) -> Self
    where
        F: FnOnce(CommandsBuilder) -> CommandsBuilder,
    {
        self.commands = f(self.commands);
        self
    }

    fn stream_start(&self) -> usize {
        match self.data_offset_field {
            0 => 0x40,
            field => field as usize + 0x34,
        }
    }

    /// Build the raw (uncompressed) file bytes
    pub fn build_bytes(&self) -> Vec<u8> {
        let start = self.stream_start();
        let stream = self.commands.build();

        assert!(start >= 0x40, "stream may not overlap the 64 byte header");

        let mut data = vec![0u8; start];
        data[0..4].copy_from_slice(&self.magic);
        data[0x34..0x38].copy_from_slice(&self.data_offset_field.to_le_bytes());
        data.extend_from_slice(&stream);

        let eof = self.eof_override.unwrap_or((data.len() - 4) as u32);
        data[4..8].copy_from_slice(&eof.to_le_bytes());
        data
    }

    /// Build gzip-compressed (VGZ) bytes
    pub fn build_vgz(&self) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.build_bytes()).expect("gzip into memory");
        encoder.finish().expect("gzip into memory")
    }

    /// Write the file under `dir`, compressed when `name` ends with .vgz
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let bytes = if name.ends_with(".vgz") {
            self.build_vgz()
        } else {
            self.build_bytes()
        };
        std::fs::write(&path, bytes).expect("write fixture");
        path
    }
}

/// Builder for the command stream
#[derive(Debug, Clone, Default)]
pub struct CommandsBuilder {
    bytes: Vec<u8>,
}

impl CommandsBuilder {
    /// Data block with the `0x66` escaped type, as written by VGM loggers
    pub fn data_block(self, type_code: u8, payload: &[u8]) -> Self {
        self.block(type_code, payload, true)
    }

    /// Data block whose type byte follows the marker directly
    pub fn bare_data_block(self, type_code: u8, payload: &[u8]) -> Self {
        self.block(type_code, payload, false)
    }

    fn block(mut self, type_code: u8, payload: &[u8], escaped: bool) -> Self {
        self.bytes.push(0x67);
        if escaped {
            self.bytes.push(0x66);
        }
        self.bytes.push(type_code);
        let size = payload.len() as u32 + 8;
        self.bytes.extend_from_slice(&size.to_le_bytes());
        self.bytes.extend_from_slice(payload);
        self.bytes.extend_from_slice(&BLOCK_TRAILER);
        self
    }

    /// Marker followed by a size that runs past the end of the stream
    pub fn broken_block(mut self, type_code: u8, declared: u32) -> Self {
        self.bytes.extend_from_slice(&[0x67, 0x66, type_code]);
        self.bytes.extend_from_slice(&declared.to_le_bytes());
        self
    }

    /// YM2612 port 0 register write
    pub fn ym2612_write(mut self, register: u8, value: u8) -> Self {
        self.bytes.extend_from_slice(&[0x52, register, value]);
        self
    }

    /// PSG write
    pub fn psg_write(mut self, value: u8) -> Self {
        self.bytes.extend_from_slice(&[0x50, value]);
        self
    }

    /// Wait 735 samples (1/60s)
    pub fn wait_60hz(mut self) -> Self {
        self.bytes.push(0x62);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn with_end(mut self) -> Self {
        self.bytes.push(0x66);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// Ready-made files for common scenarios
pub struct VgmGenerators;

impl VgmGenerators {
    /// Sega Genesis style log: a YM2612 PCM bank and a few register writes
    pub fn genesis_pcm() -> VgmBuilder {
        VgmBuilder::new().data_offset_field(0x0C).commands(|c| {
            c.data_block(0x00, &pcm_ramp(256))
                .ym2612_write(0x2B, 0x80)
                .psg_write(0x9F)
                .wait_60hz()
                .with_end()
        })
    }

    /// Arcade style log: several ROM dumps of different chips
    pub fn arcade_roms() -> VgmBuilder {
        VgmBuilder::new().data_offset_field(0xCC).commands(|c| {
            c.data_block(0x8B, &pcm_ramp(64))
                .data_block(0x8C, &[0x5A; 100])
                .data_block(0x8F, &pcm_ramp(33))
                .wait_60hz()
                .with_end()
        })
    }

    /// `count` small blocks, for capacity tests
    pub fn many_blocks(count: usize) -> VgmBuilder {
        VgmBuilder::new().commands(|mut c| {
            for i in 0..count {
                c = c.data_block(0xC0, &[i as u8; 4]);
            }
            c.with_end()
        })
    }
}

/// Deterministic payload that never contains the block marker
pub fn pcm_ramp(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| match (i % 256) as u8 {
            0x67 => 0x68,
            b => b,
        })
        .collect()
}
