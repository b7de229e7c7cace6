//! Checksummed block framing for inputs compressed in pieces.
//!
//! Large inputs can be split into fixed-size blocks, each compressed into its
//! own container with its own tree. Every container is wrapped in a frame so
//! a stream of blocks can be stored or sent as one buffer.
//!
//! # Frame Format
//!
//! ```text
//! +--------------------+
//! | Magic (4 bytes)    |  0x48 0x46 0x50 0x42 ("HFPB")
//! +--------------------+
//! | block_id (8)       |  u64 little-endian, 0, 1, 2, ...
//! +--------------------+
//! | container_len (4)  |  u32 length of the container bytes
//! +--------------------+
//! | crc32 (4)          |  u32 checksum
//! +--------------------+
//! | container          |  container_len bytes (see `container`)
//! | (variable)         |
//! +--------------------+
//! ```
//!
//! The CRC32 covers block_id, container_len and the container bytes.
//! Blocks are processed one after another; nothing here spawns threads.

use crate::codec::Codec;
use crate::container::Container;
use crate::error::{Error, FramingError, Result};
use crate::metrics::Metrics;

/// Magic number for block frames: "HFPB" (Huffman Packed Block)
const MAGIC: [u8; 4] = [0x48, 0x46, 0x50, 0x42];

/// Size of the frame header in bytes
pub const HEADER_SIZE: usize = 20;

/// One parsed frame.
#[derive(Debug, Clone)]
pub struct BlockFrame {
    /// Position of the block in the stream
    pub block_id: u64,

    /// The block's container
    pub container: Container,

    /// CRC32 checksum (already validated)
    pub crc32: u32,
}

/// Wrap serialized container bytes in a frame.
///
/// # Errors
/// `FramingError::ContainerTooLarge` if the container does not fit a u32
/// length field.
pub fn serialize_frame(block_id: u64, container_bytes: &[u8]) -> Result<Vec<u8>> {
    let container_len = u32::try_from(container_bytes.len())
        .map_err(|_| FramingError::ContainerTooLarge(container_bytes.len()))?;
    let crc32 = compute_crc(block_id, container_len, container_bytes);

    let mut frame = Vec::with_capacity(HEADER_SIZE + container_bytes.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&block_id.to_le_bytes());
    frame.extend_from_slice(&container_len.to_le_bytes());
    frame.extend_from_slice(&crc32.to_le_bytes());
    frame.extend_from_slice(container_bytes);

    Ok(frame)
}

/// Parse the frame at the start of `bytes`, returning it and the number of
/// bytes it occupied.
///
/// # Errors
/// - `FramingError::FrameTooShort` if the header or container is cut off
/// - `FramingError::InvalidMagic` if the magic number doesn't match
/// - `Error::Crc` if CRC validation fails
/// - container `FormatError`s
pub fn parse_frame(bytes: &[u8]) -> Result<(BlockFrame, usize)> {
    let Some((header, rest)) = bytes.split_first_chunk::<HEADER_SIZE>() else {
        return Err(FramingError::FrameTooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    };

    let magic = [header[0], header[1], header[2], header[3]];
    if magic != MAGIC {
        return Err(FramingError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let block_id = u64::from_le_bytes([
        header[4], header[5], header[6], header[7], header[8], header[9], header[10], header[11],
    ]);
    let container_len = u32::from_le_bytes([header[12], header[13], header[14], header[15]]);
    let crc32 = u32::from_le_bytes([header[16], header[17], header[18], header[19]]);

    let frame_len = HEADER_SIZE + container_len as usize;
    if bytes.len() < frame_len {
        return Err(FramingError::FrameTooShort {
            required: frame_len,
            actual: bytes.len(),
        }
        .into());
    }
    let container_bytes = &rest[..container_len as usize];

    let computed_crc = compute_crc(block_id, container_len, container_bytes);
    if computed_crc != crc32 {
        return Err(Error::Crc {
            expected: crc32,
            actual: computed_crc,
        });
    }

    let container = Container::from_bytes(container_bytes)?;

    Ok((
        BlockFrame {
            block_id,
            container,
            crc32,
        },
        frame_len,
    ))
}

/// True if `bytes` starts with a frame magic number rather than a bare
/// container.
///
/// A bare container only collides when its length field spells "HFPB",
/// i.e. an input of exactly 1,112,557,128 bytes.
pub fn is_block_stream(bytes: &[u8]) -> bool {
    bytes.starts_with(&MAGIC)
}

/// Compute CRC32 over the protected fields.
fn compute_crc(block_id: u64, container_len: u32, container_bytes: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&block_id.to_le_bytes());
    hasher.update(&container_len.to_le_bytes());
    hasher.update(container_bytes);
    hasher.finalize()
}

/// Split `data` into `block_bytes`-sized blocks and compress each into a
/// frame. Empty input yields an empty stream.
///
/// # Errors
/// - `Error::Config` if `block_bytes` is zero
/// - `Error::InputTooLarge` if `block_bytes` exceeds the codec limit
pub fn compress_blocks(codec: &Codec, data: &[u8], block_bytes: usize) -> Result<Vec<u8>> {
    compress_blocks_recorded(codec, data, block_bytes, &mut Metrics::new())
}

/// `compress_blocks`, recording every block container in `metrics`.
pub fn compress_blocks_recorded(
    codec: &Codec,
    data: &[u8],
    block_bytes: usize,
    metrics: &mut Metrics,
) -> Result<Vec<u8>> {
    if block_bytes == 0 {
        return Err(Error::Config("block size must be non-zero".to_string()));
    }
    if block_bytes > codec.max_input_bytes() {
        return Err(Error::InputTooLarge {
            size: block_bytes,
            max: codec.max_input_bytes(),
        });
    }

    let mut stream = Vec::new();
    for (block_id, block) in data.chunks(block_bytes).enumerate() {
        let container = codec.compress(block)?;
        metrics.record_container(&container);
        stream.extend(serialize_frame(block_id as u64, &container.to_bytes())?);
    }

    log::debug!(
        "framed {} bytes as {} blocks ({} stream bytes)",
        data.len(),
        data.len().div_ceil(block_bytes),
        stream.len()
    );

    Ok(stream)
}

/// Decode every frame of `stream` in order and concatenate the blocks.
///
/// # Errors
/// - `FramingError::UnexpectedBlockId` if blocks are missing or reordered
/// - any `parse_frame` or decoding error
pub fn decompress_blocks(codec: &Codec, stream: &[u8]) -> Result<Vec<u8>> {
    decompress_blocks_recorded(codec, stream, &mut Metrics::new())
}

/// `decompress_blocks`, recording every block container in `metrics`.
pub fn decompress_blocks_recorded(
    codec: &Codec,
    stream: &[u8],
    metrics: &mut Metrics,
) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut offset = 0;
    let mut expected_id = 0u64;

    while offset < stream.len() {
        let (frame, consumed) = parse_frame(&stream[offset..])?;
        if frame.block_id != expected_id {
            return Err(FramingError::UnexpectedBlockId {
                expected: expected_id,
                actual: frame.block_id,
            }
            .into());
        }
        output.extend(codec.decompress(&frame.container)?);
        metrics.record_container(&frame.container);
        offset += consumed;
        expected_id += 1;
    }

    Ok(output)
}
