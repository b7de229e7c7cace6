//! Error types for the huffpack codec.
//!
//! Every fallible operation returns a structured error instead of panicking.
//! A corrupted container must never decode into plausible-looking output, so
//! header problems and payload problems are reported separately.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a failure domain:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Huffman: tree or code table construction
/// - Format: container header cannot be parsed or is inconsistent
/// - Decode: payload bits do not resolve to a complete symbol
/// - Framing: block frame serialization/parsing
/// - CRC: block frame corruption detected
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman tree or code table error
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Malformed container header
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Corrupt payload
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Block frame error (e.g., invalid magic, length mismatch)
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// Input exceeds the configured (or format) size limit
    #[error("input too large: {size} bytes exceeds limit of {max} bytes")]
    InputTooLarge { size: usize, max: usize },

    /// CRC validation failed, indicating data corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// Decompressed output differs from the data that was compressed
    #[error("round trip mismatch at byte {offset}: {input_len} bytes in, {output_len} bytes out")]
    RoundTripMismatch {
        offset: usize,
        input_len: usize,
        output_len: usize,
    },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits requested)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman tree and code table errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty frequency table: cannot build tree")]
    EmptyFrequencyTable,

    /// A leaf sits deeper than a code can represent
    #[error("code length {length} exceeds maximum {max}")]
    CodeLengthTooLong { length: usize, max: usize },

    /// Symbol has no entry in the code table
    #[error("symbol {0:#04x} has no code")]
    MissingSymbol(u8),
}

/// Container header errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Buffer is too short to contain the fixed header
    #[error("container too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Pad-bit count outside 0..=7
    #[error("invalid pad-bit count {0}")]
    InvalidPadBits(u8),

    /// Tree section ended before every internal node had two children
    #[error("tree section truncated")]
    TruncatedTree,

    /// Tree section describes more nodes than a byte alphabet allows
    #[error("tree section has too many nodes")]
    TooManyNodes,

    /// Same symbol appears on two leaves
    #[error("duplicate symbol {0:#04x} in tree section")]
    DuplicateSymbol(u8),

    /// Root of a non-empty container is a bare leaf
    #[error("tree root must be an internal node")]
    LeafRoot,

    /// Padding after the tree section or payload is not zero
    #[error("non-zero padding bits")]
    NonZeroPadding,

    /// Non-empty container without a tree section
    #[error("missing tree section for {0} byte payload")]
    MissingTree(u32),

    /// Empty container carrying a tree or payload
    #[error("empty container has trailing data")]
    UnexpectedData,

    /// Declared original length does not fit the payload
    #[error("declared length {declared} inconsistent with {payload_bits} payload bits")]
    LengthMismatch { declared: u32, payload_bits: usize },
}

/// Payload decoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload bits ran out in the middle of a code
    #[error("payload truncated at bit {position} after {decoded} of {expected} symbols")]
    Truncated {
        position: usize,
        decoded: usize,
        expected: usize,
    },
}

/// Block framing errors.
#[derive(Debug, Error)]
pub enum FramingError {
    /// Invalid magic number in frame header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Frame is too short to contain a valid header or its container
    #[error("frame too short: need at least {required} bytes, got {actual}")]
    FrameTooShort { required: usize, actual: usize },

    /// Block arrived out of sequence
    #[error("unexpected block id: expected {expected}, got {actual}")]
    UnexpectedBlockId { expected: u64, actual: u64 },

    /// Container too large to frame
    #[error("container length {0} does not fit in a frame")]
    ContainerTooLarge(usize),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
