//! Size-bounded entry point for callers handling untrusted buffers.

use crate::container::Container;
use crate::decoder;
use crate::encoder::{self, MAX_FORMAT_INPUT};
use crate::error::{Error, Result};

/// Default limit on uncompressed size: 256 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 256 * 1024 * 1024;

/// Codec limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest uncompressed buffer accepted in either direction.
    /// Values above the format limit (`u32::MAX`) are clamped.
    pub max_input_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Stateless compressor/decompressor with an input size policy.
///
/// Holds no mutable state, so one instance can be shared freely across
/// threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Effective limit after clamping to the format limit.
    pub fn max_input_bytes(&self) -> usize {
        self.config.max_input_bytes.min(MAX_FORMAT_INPUT)
    }

    /// Compress `data`.
    ///
    /// # Errors
    /// `Error::InputTooLarge` if `data` exceeds the configured limit.
    pub fn compress(&self, data: &[u8]) -> Result<Container> {
        self.check_size(data.len())?;
        encoder::encode(data)
    }

    /// Decompress `container`.
    ///
    /// The declared length is checked against the limit before any output
    /// is allocated.
    pub fn decompress(&self, container: &Container) -> Result<Vec<u8>> {
        self.check_size(container.original_len() as usize)?;
        decoder::decode(container)
    }

    /// Compress straight to the wire layout.
    pub fn compress_to_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.compress(data)?.to_bytes())
    }

    /// Parse the wire layout and decompress.
    pub fn decompress_from_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let container = Container::from_bytes(bytes)?;
        self.decompress(&container)
    }

    fn check_size(&self, size: usize) -> Result<()> {
        let max = self.max_input_bytes();
        if size > max {
            log::warn!("rejecting {size} byte buffer (limit {max})");
            return Err(Error::InputTooLarge { size, max });
        }
        Ok(())
    }
}
