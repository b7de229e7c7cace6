//! The self-describing compressed artifact.
//!
//! # Layout
//!
//! ```text
//! +----------------------+
//! | original_len (4)     |  u32 little-endian
//! +----------------------+
//! | pad_bits (1)         |  zero bits appended to the payload (0-7)
//! +----------------------+
//! | tree section         |  pre-order tree, zero-padded to a byte;
//! | (variable)           |  absent when original_len == 0
//! +----------------------+
//! | payload              |  packed codes, MSB-first
//! | (variable)           |
//! +----------------------+
//! ```
//!
//! An empty input is exactly the five bytes `00 00 00 00 00`.

use crate::error::{FormatError, Result};
use crate::tree::HuffmanTree;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 5;

/// A compressed buffer: header fields plus packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    original_len: u32,
    pad_bits: u8,
    tree: Option<HuffmanTree>,
    payload: Vec<u8>,
}

impl Container {
    /// The container for an empty input.
    pub fn empty() -> Self {
        Self {
            original_len: 0,
            pad_bits: 0,
            tree: None,
            payload: Vec::new(),
        }
    }

    /// Assemble a container from its parts.
    ///
    /// No consistency checks are made here; `decoder::decode` validates
    /// the combination.
    pub fn new(
        original_len: u32,
        pad_bits: u8,
        tree: Option<HuffmanTree>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            original_len,
            pad_bits,
            tree,
            payload,
        }
    }

    pub fn original_len(&self) -> u32 {
        self.original_len
    }

    pub fn pad_bits(&self) -> u8 {
        self.pad_bits
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn is_empty(&self) -> bool {
        self.original_len == 0
    }

    /// Number of real (non-padding) payload bits.
    ///
    /// Saturates at zero when `pad_bits` claims more bits than exist.
    pub fn payload_bits(&self) -> usize {
        (self.payload.len() * 8).saturating_sub(self.pad_bits as usize)
    }

    /// Serialize to the wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let tree_section = self.tree.as_ref().map(HuffmanTree::serialize);
        let tree_len = tree_section.as_ref().map_or(0, Vec::len);

        let mut bytes = Vec::with_capacity(HEADER_SIZE + tree_len + self.payload.len());
        bytes.extend_from_slice(&self.original_len.to_le_bytes());
        bytes.push(self.pad_bits);
        if let Some(section) = tree_section {
            bytes.extend_from_slice(&section);
        }
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Parse the wire layout.
    ///
    /// Only structural checks happen here (header size, pad-bit range, tree
    /// section); length/payload agreement is checked when decoding.
    ///
    /// # Errors
    /// - `FormatError::TooShort` if the fixed header is incomplete
    /// - `FormatError::InvalidPadBits` if the pad count exceeds 7
    /// - `FormatError::UnexpectedData` if an empty container has trailing bytes
    /// - tree section errors from `HuffmanTree::deserialize`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some((header, rest)) = bytes.split_first_chunk::<HEADER_SIZE>() else {
            return Err(FormatError::TooShort {
                required: HEADER_SIZE,
                actual: bytes.len(),
            }
            .into());
        };

        let original_len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let pad_bits = header[4];
        if pad_bits > 7 {
            return Err(FormatError::InvalidPadBits(pad_bits).into());
        }

        if original_len == 0 {
            if pad_bits != 0 || !rest.is_empty() {
                return Err(FormatError::UnexpectedData.into());
            }
            return Ok(Self::empty());
        }

        let (tree, tree_len) = HuffmanTree::deserialize(rest)?;

        Ok(Self {
            original_len,
            pad_bits,
            tree: Some(tree),
            payload: rest[tree_len..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_layout() {
        let bytes = Container::empty().to_bytes();
        assert_eq!(bytes, vec![0, 0, 0, 0, 0]);

        let parsed = Container::from_bytes(&bytes).unwrap();
        assert!(parsed.is_empty());
        assert!(parsed.tree().is_none());
        assert!(parsed.payload().is_empty());
    }

    #[test]
    fn test_too_short() {
        let result = Container::from_bytes(&[1, 0, 0]);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TooShort {
                required: 5,
                actual: 3
            }))
        ));
    }

    #[test]
    fn test_invalid_pad_bits() {
        let result = Container::from_bytes(&[1, 0, 0, 0, 8, 0x50]);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::InvalidPadBits(8)))
        ));
    }

    #[test]
    fn test_empty_with_trailing_data() {
        let result = Container::from_bytes(&[0, 0, 0, 0, 0, 0xAA]);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::UnexpectedData))
        ));
    }

    #[test]
    fn test_missing_tree_section() {
        let result = Container::from_bytes(&[3, 0, 0, 0, 0]);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TruncatedTree))
        ));
    }

    #[test]
    fn test_parse_known_bytes() {
        let bytes = [
            0x0B, 0x00, 0x00, 0x00, 0x04, 0x50, 0x54, 0x25, 0x12, 0x86, 0x05, 0x5F, 0xE0,
        ];
        let container = Container::from_bytes(&bytes).unwrap();
        assert_eq!(container.original_len(), 11);
        assert_eq!(container.pad_bits(), 4);
        assert_eq!(container.payload(), &[0x05, 0x5F, 0xE0]);
        assert_eq!(container.payload_bits(), 20);
        assert_eq!(container.tree().unwrap().leaf_count(), 4);
        assert_eq!(container.to_bytes(), bytes);
    }

    #[test]
    fn test_reparsed_container_is_equal() {
        let inputs: [&[u8]; 4] = [b"hello world! this is a test.", b"zzzz", b"AAAAABBBCCD", b""];
        for data in inputs {
            let container = crate::encoder::encode(data).unwrap();
            let parsed = Container::from_bytes(&container.to_bytes()).unwrap();
            assert_eq!(parsed, container);
        }
    }

    #[test]
    fn test_different_payloads_are_unequal() {
        let a = crate::encoder::encode(b"abab").unwrap();
        let b = crate::encoder::encode(b"baba").unwrap();
        assert_eq!(a.tree(), b.tree());
        assert_ne!(a, b);
    }
}
