use std::path::Path;

use crate::errors::IoError;

/// Produces the decoded bytes of a VGM file, plain or gzip-backed
pub trait ByteSource {
    fn read(&self, path: &Path) -> Result<Vec<u8>, IoError>;
}

/// Receives every extracted payload, in scan order
pub trait BlockSink {
    fn persist(&mut self, index: usize, payload: &[u8]) -> Result<(), IoError>;
}

impl<S: BlockSink + ?Sized> BlockSink for &mut S {
    fn persist(&mut self, index: usize, payload: &[u8]) -> Result<(), IoError> {
        (**self).persist(index, payload)
    }
}
