//! Bit-level I/O for the tree section and the payload.
//!
//! `BitWriter` and `BitReader` both work most-significant-bit first: the
//! first bit written lands in bit 7 of byte 0.
//!
//! # Padding Rules
//! - `BitWriter::finish` zero-fills the final partial byte and reports how
//!   many pad bits it added (0-7).
//! - `BitReader` can be limited to a number of real bits so that trailing
//!   pad bits are never handed out as data.
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bit(true);
//! let (bytes, pad_bits) = writer.finish();
//! assert_eq!(bytes, vec![0b1011_0000]);
//! assert_eq!(pad_bits, 4);
//!
//! let mut reader = BitReader::with_bit_len(&bytes, 4);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert!(reader.read_bit().unwrap());
//! assert!(reader.read_bit().is_err());
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a growing byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - unused low bits of `bit_buffer` are zero
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bytes` output bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.flush_byte();
        }
    }

    /// Write the lowest `count` bits of `value`, highest of those first.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            let free = 8 - self.bit_count as usize;
            let take = remaining.min(free);
            let shift = remaining - take;
            let chunk = ((value >> shift) & ((1u64 << take) - 1)) as u8;

            self.bit_buffer |= chunk << (free - take);
            self.bit_count += take as u8;
            if self.bit_count == 8 {
                self.flush_byte();
            }
            remaining -= take;
        }

        Ok(())
    }

    /// Write a whole byte MSB-first.
    pub fn write_u8(&mut self, byte: u8) {
        if self.bit_count == 0 {
            self.bytes.push(byte);
            return;
        }
        let shift = self.bit_count;
        self.bit_buffer |= byte >> shift;
        self.bytes.push(self.bit_buffer);
        self.bit_buffer = byte << (8 - shift);
    }

    /// Zero-pad to the next byte boundary and return the bytes together
    /// with the number of pad bits added (0-7).
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        let pad_bits = self.pad_bits();
        if self.bit_count > 0 {
            self.flush_byte();
        }
        (self.bytes, pad_bits)
    }

    /// Number of zero bits `finish` would append.
    pub fn pad_bits(&self) -> u8 {
        (8 - self.bit_count) % 8
    }

    /// Total number of bits written (including the partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    fn flush_byte(&mut self) {
        self.bytes.push(self.bit_buffer);
        self.bit_buffer = 0;
        self.bit_count = 0;
    }
}

/// Reads bits MSB-first from a byte slice.
///
/// # Invariants
/// - `bit_position <= bit_len <= data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Number of readable bits; anything after is padding
    bit_len: usize,
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_bit_len(data, data.len() * 8)
    }

    /// Create a reader that stops after `bit_len` bits.
    ///
    /// `bit_len` is clamped to the number of bits in `data`.
    pub fn with_bit_len(data: &'a [u8], bit_len: usize) -> Self {
        Self {
            data,
            bit_len: bit_len.min(data.len() * 8),
            bit_position: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once the readable bits are used up.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_position >= self.bit_len {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let byte = self.data[self.bit_position / 8];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Read up to 64 bits, first bit read ending up most significant.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut result = 0u64;
        let mut remaining = count;
        while remaining > 0 {
            let bit_offset = self.bit_position % 8;
            let bits_in_byte = 8 - bit_offset;
            let take = remaining.min(bits_in_byte);

            let byte = self.data[self.bit_position / 8];
            let mask = ((1u16 << take) - 1) as u8;
            let bits = (byte >> (bits_in_byte - take)) & mask;

            result = (result << take) | u64::from(bits);
            self.bit_position += take;
            remaining -= take;
        }

        Ok(result)
    }

    /// Read eight bits as a byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Skip to the next byte boundary, returning the skipped bits.
    ///
    /// Returns 0 when already aligned.
    pub fn align_to_byte(&mut self) -> Result<u8> {
        let skip = (8 - self.bit_position % 8) % 8;
        Ok(self.read_bits(skip)? as u8)
    }

    /// Number of readable bits left.
    pub fn bits_remaining(&self) -> usize {
        self.bit_len - self.bit_position
    }

    /// Current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Number of whole bytes consumed so far (a partial byte counts).
    pub fn byte_position(&self) -> usize {
        self.bit_position.div_ceil(8)
    }

    /// True once every readable bit has been consumed.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_len
    }
}
