//! Symbol to bit-code lookup derived from a Huffman tree.
//!
//! Codes are collected by a single depth-first walk: a left edge appends 0,
//! a right edge appends 1. Since only leaves receive codes and no leaf is an
//! ancestor of another, the resulting set is prefix-free.

use std::fmt;

use crate::bitio::BitWriter;
use crate::error::{HuffmanError, Result};
use crate::tree::{HuffmanTree, Node};

/// Longest code the table can hold.
pub const MAX_CODE_LEN: usize = 64;

/// One prefix code, stored right-aligned in `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if `self` is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for shift in (0..self.len).rev() {
            let bit = (self.bits >> shift) & 1;
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

/// Flat symbol -> code table for one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; 256],
}

impl CodeTable {
    /// Derive the code for every leaf of `tree`.
    ///
    /// # Errors
    /// `HuffmanError::CodeLengthTooLong` if a leaf is deeper than
    /// `MAX_CODE_LEN`.
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut codes = [None; 256];
        let mut stack = vec![(tree.root(), 0u64, 0usize)];

        while let Some((node, bits, len)) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => {
                    codes[*symbol as usize] = Some(Code {
                        bits,
                        len: len as u8,
                    });
                }
                Node::Internal { left, right, .. } => {
                    if len == MAX_CODE_LEN {
                        return Err(HuffmanError::CodeLengthTooLong {
                            length: len + 1,
                            max: MAX_CODE_LEN,
                        }
                        .into());
                    }
                    stack.push((&**right, (bits << 1) | 1, len + 1));
                    stack.push((&**left, bits << 1, len + 1));
                }
            }
        }

        Ok(Self { codes })
    }

    /// Code for `symbol`, if the tree has a leaf for it.
    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|code| (symbol as u8, code)))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the code for `symbol` to `writer`.
    ///
    /// # Errors
    /// `HuffmanError::MissingSymbol` if the table has no code for it.
    pub fn write_symbol(&self, symbol: u8, writer: &mut BitWriter) -> Result<()> {
        let code = self
            .get(symbol)
            .ok_or(HuffmanError::MissingSymbol(symbol))?;
        writer.write_bits(code.bits, code.len())
    }

    /// Number of payload bits needed to encode `data`.
    pub fn encoded_bit_len(&self, data: &[u8]) -> Result<usize> {
        data.iter().try_fold(0usize, |acc, &symbol| {
            let code = self
                .get(symbol)
                .ok_or(HuffmanError::MissingSymbol(symbol))?;
            Ok(acc + code.len())
        })
    }

    /// Check that no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<Code> = self.iter().map(|(_, code)| code).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn table_for(data: &[u8]) -> CodeTable {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap();
        CodeTable::from_tree(&tree).unwrap()
    }

    #[test]
    fn test_known_codes() {
        let table = table_for(b"AAAAABBBCCD");
        assert_eq!(table.get(b'A').unwrap().to_string(), "0");
        assert_eq!(table.get(b'B').unwrap().to_string(), "10");
        assert_eq!(table.get(b'D').unwrap().to_string(), "110");
        assert_eq!(table.get(b'C').unwrap().to_string(), "111");
        assert_eq!(table.get(b'E'), None);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_single_symbol_code() {
        let table = table_for(b"qqqqqq");
        assert_eq!(table.get(b'q').unwrap().to_string(), "0");
        assert_eq!(table.encoded_bit_len(b"qqqqqq").unwrap(), 6);
    }

    #[test]
    fn test_prefix_free_full_alphabet() {
        let data: Vec<u8> = (0..=255u8)
            .flat_map(|b| std::iter::repeat(b).take(1 + b as usize % 17))
            .collect();
        let table = table_for(&data);
        assert_eq!(table.len(), 256);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_is_prefix_of() {
        let a = Code { bits: 0b10, len: 2 };
        let b = Code {
            bits: 0b101,
            len: 3,
        };
        let c = Code {
            bits: 0b111,
            len: 3,
        };
        assert!(a.is_prefix_of(&b));
        assert!(!a.is_prefix_of(&c));
        assert!(!b.is_prefix_of(&a));
    }

    #[test]
    fn test_write_symbol() {
        let table = table_for(b"AAAAABBBCCD");
        let mut writer = BitWriter::new();
        for &b in b"BD" {
            table.write_symbol(b, &mut writer).unwrap();
        }
        let (bytes, pad) = writer.finish();
        assert_eq!(bytes, vec![0b1011_0000]);
        assert_eq!(pad, 3);

        let mut writer = BitWriter::new();
        assert!(table.write_symbol(b'Z', &mut writer).is_err());
    }
}
