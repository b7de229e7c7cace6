//! Huffman tree construction and the pre-order tree section.
//!
//! # Construction
//!
//! One leaf per distinct symbol goes into a min-priority queue keyed by
//! `(weight, sequence)`. Leaves get sequence numbers in ascending symbol
//! order; every merged node takes the next number. The two smallest entries
//! are popped, the first becoming the left child, and their merge is pushed
//! back until one node remains. Equal weights therefore always resolve the
//! same way, whatever the heap implementation does internally.
//!
//! A single distinct symbol gets a synthetic internal root whose right child
//! is a weight-0 placeholder leaf, so the real symbol still gets a one-bit
//! code.
//!
//! # Tree section
//!
//! ```text
//! internal node: 0 <left subtree> <right subtree>
//! leaf:          1 <8-bit symbol>
//! ```
//!
//! The section is self-terminating and zero-padded to a whole byte.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, FormatError, HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// Most leaves a tree over a byte alphabet can have.
pub const MAX_LEAVES: usize = 256;

/// Most internal nodes a tree with `MAX_LEAVES` leaves can have.
pub const MAX_INTERNAL_NODES: usize = MAX_LEAVES - 1;

/// A node of a Huffman tree.
///
/// Weights are only meaningful on trees built from a frequency table; a tree
/// read back from a tree section carries weight 0 everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(symbol: u8, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    /// Join two subtrees under a new internal node.
    pub fn merge(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Queue entry; ordering only looks at `(weight, sequence)`.
struct QueueEntry {
    weight: u64,
    sequence: usize,
    node: Node,
}

impl QueueEntry {
    fn key(&self) -> (u64, usize) {
        (self.weight, self.sequence)
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

/// A Huffman tree whose root is always an internal node.
///
/// Two trees are equal when they have the same shape and the same symbols
/// on their leaves. Weights are ignored since the tree section does not
/// carry them.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    root: Node,
}

impl PartialEq for HuffmanTree {
    fn eq(&self, other: &Self) -> bool {
        same_shape(&self.root, &other.root)
    }
}

impl Eq for HuffmanTree {}

impl HuffmanTree {
    /// Build the tree for a non-empty frequency table.
    ///
    /// # Errors
    /// `HuffmanError::EmptyFrequencyTable` if no symbol has a non-zero count.
    pub fn build(freqs: &FrequencyTable) -> Result<Self> {
        let mut symbols = freqs.iter();
        let root = match (symbols.next(), symbols.next()) {
            (None, _) => return Err(HuffmanError::EmptyFrequencyTable.into()),
            (Some((symbol, count)), None) => Node::merge(
                Node::leaf(symbol, count),
                Node::leaf(symbol.wrapping_add(1), 0),
            ),
            _ => merge_queue(freqs)?,
        };

        log::trace!(
            "built huffman tree: {} leaves, depth {}, weight {}",
            freqs.distinct_symbols(),
            depth(&root),
            root.weight()
        );

        Ok(Self { root })
    }

    /// Wrap an existing root.
    ///
    /// # Errors
    /// `FormatError::LeafRoot` if `root` is a bare leaf.
    pub fn from_root(root: Node) -> Result<Self> {
        if root.is_leaf() {
            return Err(FormatError::LeafRoot.into());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Total weight (input length for built trees).
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        count_leaves(&self.root)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        depth(&self.root)
    }

    /// Append the pre-order tree section (unpadded) to `writer`.
    pub fn write_to(&self, writer: &mut BitWriter) {
        write_node(&self.root, writer);
    }

    /// Serialize the tree section, zero-padded to a whole byte.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        self.write_to(&mut writer);
        writer.finish().0
    }

    /// Parse a tree section from `reader`, leaving it positioned just after
    /// the final leaf symbol.
    pub fn read_from(reader: &mut BitReader<'_>) -> Result<Self> {
        let mut parser = TreeParser {
            reader,
            leaves: 0,
            internal: 0,
            seen: [false; MAX_LEAVES],
        };
        let root = parser.parse_node()?;
        Self::from_root(root)
    }

    /// Parse a byte-padded tree section, returning the tree and the number
    /// of bytes it occupied.
    ///
    /// # Errors
    /// `FormatError` on truncation, oversize trees, duplicate symbols,
    /// non-zero padding or a bare-leaf root.
    pub fn deserialize(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut reader = BitReader::new(bytes);
        let tree = Self::read_from(&mut reader)?;
        if reader.align_to_byte()? != 0 {
            return Err(FormatError::NonZeroPadding.into());
        }
        Ok((tree, reader.byte_position()))
    }
}

fn merge_queue(freqs: &FrequencyTable) -> Result<Node> {
    let mut heap = BinaryHeap::with_capacity(freqs.distinct_symbols());
    let mut sequence = 0usize;

    for (symbol, count) in freqs.iter() {
        heap.push(Reverse(QueueEntry {
            weight: count,
            sequence,
            node: Node::leaf(symbol, count),
        }));
        sequence += 1;
    }

    loop {
        let Some(Reverse(left)) = heap.pop() else {
            return Err(HuffmanError::EmptyFrequencyTable.into());
        };
        let Some(Reverse(right)) = heap.pop() else {
            return Ok(left.node);
        };
        let node = Node::merge(left.node, right.node);
        heap.push(Reverse(QueueEntry {
            weight: node.weight(),
            sequence,
            node,
        }));
        sequence += 1;
    }
}

fn write_node(node: &Node, writer: &mut BitWriter) {
    match node {
        Node::Leaf { symbol, .. } => {
            writer.write_bit(true);
            writer.write_u8(*symbol);
        }
        Node::Internal { left, right, .. } => {
            writer.write_bit(false);
            write_node(left, writer);
            write_node(right, writer);
        }
    }
}

struct TreeParser<'r, 'a> {
    reader: &'r mut BitReader<'a>,
    leaves: usize,
    internal: usize,
    seen: [bool; MAX_LEAVES],
}

impl TreeParser<'_, '_> {
    // Recursion depth is bounded by MAX_INTERNAL_NODES.
    fn parse_node(&mut self) -> Result<Node> {
        if self.read_bit()? {
            let symbol = self.reader.read_u8().map_err(truncated)?;
            if self.leaves == MAX_LEAVES {
                return Err(FormatError::TooManyNodes.into());
            }
            if std::mem::replace(&mut self.seen[symbol as usize], true) {
                return Err(FormatError::DuplicateSymbol(symbol).into());
            }
            self.leaves += 1;
            Ok(Node::leaf(symbol, 0))
        } else {
            if self.internal == MAX_INTERNAL_NODES {
                return Err(FormatError::TooManyNodes.into());
            }
            self.internal += 1;
            let left = self.parse_node()?;
            let right = self.parse_node()?;
            Ok(Node::merge(left, right))
        }
    }

    fn read_bit(&mut self) -> Result<bool> {
        self.reader.read_bit().map_err(truncated)
    }
}

fn truncated(_: Error) -> Error {
    FormatError::TruncatedTree.into()
}

fn same_shape(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Leaf { symbol: x, .. }, Node::Leaf { symbol: y, .. }) => x == y,
        (
            Node::Internal {
                left: a_left,
                right: a_right,
                ..
            },
            Node::Internal {
                left: b_left,
                right: b_right,
                ..
            },
        ) => same_shape(a_left, b_left) && same_shape(a_right, b_right),
        _ => false,
    }
}

fn count_leaves(node: &Node) -> usize {
    match node {
        Node::Leaf { .. } => 1,
        Node::Internal { left, right, .. } => count_leaves(left) + count_leaves(right),
    }
}

fn depth(node: &Node) -> usize {
    match node {
        Node::Leaf { .. } => 0,
        Node::Internal { left, right, .. } => 1 + depth(left).max(depth(right)),
    }
}
