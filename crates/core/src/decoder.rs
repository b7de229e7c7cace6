//! Container -> byte buffer.
//!
//! Decoding walks the tree bit by bit and stops after exactly
//! `original_len` symbols. Pad bits are never read, and real bits left over
//! after the last symbol mean the header lied about the length.

use crate::bitio::BitReader;
use crate::container::Container;
use crate::error::{DecodeError, FormatError, Result};
use crate::tree::{HuffmanTree, Node};

/// Decompress a container.
///
/// # Errors
/// - `FormatError` if the header disagrees with itself or with the payload
/// - `DecodeError::Truncated` if the payload ends inside a code
pub fn decode(container: &Container) -> Result<Vec<u8>> {
    let expected = container.original_len() as usize;

    if container.pad_bits() > 7 {
        return Err(FormatError::InvalidPadBits(container.pad_bits()).into());
    }

    if expected == 0 {
        if container.tree().is_some() || !container.payload().is_empty() {
            return Err(FormatError::UnexpectedData.into());
        }
        return Ok(Vec::new());
    }

    let tree = container
        .tree()
        .ok_or(FormatError::MissingTree(container.original_len()))?;

    let payload = container.payload();
    let pad_bits = container.pad_bits() as usize;
    let payload_bits = container.payload_bits();
    // Every symbol costs at least one bit since the root is internal
    if pad_bits > payload.len() * 8 || expected > payload_bits {
        return Err(FormatError::LengthMismatch {
            declared: container.original_len(),
            payload_bits,
        }
        .into());
    }
    if !padding_is_zero(payload, pad_bits) {
        return Err(FormatError::NonZeroPadding.into());
    }

    let mut reader = BitReader::with_bit_len(payload, payload_bits);
    let output = walk(tree, &mut reader, expected)?;

    if !reader.is_empty() {
        return Err(FormatError::LengthMismatch {
            declared: container.original_len(),
            payload_bits,
        }
        .into());
    }

    log::debug!(
        "decoded {} payload bytes into {} bytes",
        payload.len(),
        output.len()
    );

    Ok(output)
}

/// Emit `count` symbols by walking `tree` with bits from `reader`.
fn walk(tree: &HuffmanTree, reader: &mut BitReader<'_>, count: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(count);
    let mut node = tree.root();

    while output.len() < count {
        match node {
            Node::Leaf { symbol, .. } => {
                output.push(*symbol);
                node = tree.root();
            }
            Node::Internal { left, right, .. } => {
                let bit = reader.read_bit().map_err(|_| DecodeError::Truncated {
                    position: reader.position(),
                    decoded: output.len(),
                    expected: count,
                })?;
                node = if bit { &**right } else { &**left };
            }
        }
    }

    Ok(output)
}

fn padding_is_zero(payload: &[u8], pad_bits: usize) -> bool {
    match payload.last() {
        Some(&last) if pad_bits > 0 => last & ((1u8 << pad_bits) - 1) == 0,
        _ => true,
    }
}
