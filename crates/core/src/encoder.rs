//! Byte buffer -> container.

use crate::bitio::BitWriter;
use crate::codebook::CodeTable;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

/// Largest input the 4-byte length field can describe.
pub const MAX_FORMAT_INPUT: usize = u32::MAX as usize;

/// Compress `data` into a container.
///
/// Empty input produces `Container::empty()`. Nothing is read or written
/// outside the returned value.
///
/// # Errors
/// `Error::InputTooLarge` if `data` is longer than `MAX_FORMAT_INPUT`.
pub fn encode(data: &[u8]) -> Result<Container> {
    if data.len() > MAX_FORMAT_INPUT {
        return Err(Error::InputTooLarge {
            size: data.len(),
            max: MAX_FORMAT_INPUT,
        });
    }
    if data.is_empty() {
        return Ok(Container::empty());
    }

    let freqs = FrequencyTable::from_bytes(data);
    let tree = HuffmanTree::build(&freqs)?;
    let codes = CodeTable::from_tree(&tree)?;

    let payload_bits = codes.encoded_bit_len(data)?;
    let mut writer = BitWriter::with_capacity(payload_bits.div_ceil(8));
    for &byte in data {
        codes.write_symbol(byte, &mut writer)?;
    }
    let (payload, pad_bits) = writer.finish();

    log::debug!(
        "encoded {} bytes ({} symbols, depth {}) into {} payload bytes, {} pad bits",
        data.len(),
        freqs.distinct_symbols(),
        tree.depth(),
        payload.len(),
        pad_bits
    );

    Ok(Container::new(data.len() as u32, pad_bits, Some(tree), payload))
}
