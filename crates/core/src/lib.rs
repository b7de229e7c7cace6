//! huffpack-core: lossless Huffman coding with a self-describing container
//!
//! This library turns a byte buffer into a smaller bit-packed container and
//! back again, exactly:
//! - Counts symbol frequencies
//! - Builds a Huffman tree with a deterministic tie-break
//! - Derives a flat code table and packs codes MSB-first
//! - Stores the tree shape in the container so decoding needs nothing else
//!
//! # Architecture
//!
//! - `bitio`: Low-level bit reading/writing
//! - `frequency`: Symbol counting
//! - `tree`: Tree construction and the pre-order tree section
//! - `codebook`: Symbol -> code lookup
//! - `encoder` / `decoder`: The two directions of the transform
//! - `container`: Wire layout of the compressed artifact
//! - `codec`: Size-limited facade
//! - `framing`: Checksummed multi-block streams
//! - `metrics`: Observable run statistics
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic**: The same input always yields the same bytes
//! - **Pure**: No I/O and no shared state inside the codec
//!
//! # Example
//! ```
//! let container = huffpack_core::compress(b"AAAAABBBCCD").unwrap();
//! assert_eq!(container.payload().len(), 3);
//!
//! let bytes = container.to_bytes();
//! let restored = huffpack_core::decompress_from_bytes(&bytes).unwrap();
//! assert_eq!(restored, b"AAAAABBBCCD");
//! ```

pub mod bitio;
pub mod codebook;
pub mod codec;
pub mod container;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod frequency;
pub mod metrics;
pub mod tree;

// Re-export commonly used types
pub use codec::{Codec, CodecConfig};
pub use container::Container;
pub use error::{Error, Result};

/// Compress `data` into a container.
///
/// Fails only if `data` is longer than the 4-byte length field allows.
pub fn compress(data: &[u8]) -> Result<Container> {
    encoder::encode(data)
}

/// Decompress a container produced by `compress`.
pub fn decompress(container: &Container) -> Result<Vec<u8>> {
    decoder::decode(container)
}

/// Compress straight to the wire layout.
pub fn compress_to_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Ok(compress(data)?.to_bytes())
}

/// Parse the wire layout and decompress.
pub fn decompress_from_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    decompress(&Container::from_bytes(bytes)?)
}
