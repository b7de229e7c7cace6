//! Integration tests for the full codec pipeline.
//!
//! These tests go through the public API only: bytes -> container ->
//! wire bytes -> container -> bytes, plus block streams and deliberate
//! corruption.

use huffpack_core::{
    codebook::CodeTable,
    compress, compress_to_bytes, decompress, decompress_from_bytes,
    error::Error,
    framing::{compress_blocks, decompress_blocks},
    frequency::FrequencyTable,
    tree::{HuffmanTree, Node},
    Codec, Container,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

fn round_trip(data: &[u8]) -> Vec<u8> {
    let bytes = compress_to_bytes(data).expect("compression failed");
    decompress_from_bytes(&bytes).expect("decompression failed")
}

fn weight_of(node: &Node) -> u64 {
    match node {
        Node::Leaf { weight, .. } => *weight,
        Node::Internal {
            weight,
            left,
            right,
        } => {
            assert_eq!(*weight, weight_of(left) + weight_of(right));
            *weight
        }
    }
}

/// Flip every payload bit in turn; each result must be a same-length
/// decode or a reported error.
fn assert_payload_flips_are_safe(data: &[u8]) {
    let bytes = compress_to_bytes(data).unwrap();
    let payload_len = compress(data).unwrap().payload().len();
    let payload_start = bytes.len() - payload_len;

    for byte in payload_start..bytes.len() {
        for bit in 0..8 {
            let mut corrupt = bytes.clone();
            corrupt[byte] ^= 1 << bit;
            match decompress_from_bytes(&corrupt) {
                Ok(out) => assert_eq!(out.len(), data.len()),
                Err(Error::Format(_)) | Err(Error::Decode(_)) => {}
                Err(other) => panic!("unexpected error kind: {other}"),
            }
        }
    }
}

#[test]
fn test_concrete_scenario() {
    let input = b"AAAAABBBCCD";
    let container = compress(input).unwrap();

    let expected_root = Node::merge(
        Node::leaf(b'A', 5),
        Node::merge(
            Node::leaf(b'B', 3),
            Node::merge(Node::leaf(b'D', 1), Node::leaf(b'C', 2)),
        ),
    );
    assert_eq!(container.tree().unwrap().root(), &expected_root);
    assert!(container.payload().len() < input.len());

    assert_eq!(
        container.to_bytes(),
        vec![0x0B, 0x00, 0x00, 0x00, 0x04, 0x50, 0x54, 0x25, 0x12, 0x86, 0x05, 0x5F, 0xE0]
    );
    assert_eq!(decompress(&container).unwrap(), input);
}

#[test]
fn test_empty_input() {
    let container = compress(&[]).unwrap();
    assert_eq!(container.original_len(), 0);
    assert!(container.tree().is_none());
    assert!(container.payload().is_empty());
    assert_eq!(container.to_bytes(), vec![0u8; 5]);
    assert!(round_trip(&[]).is_empty());
}

#[test]
fn test_single_byte() {
    assert_eq!(round_trip(b"A"), b"A");
}

#[test]
fn test_single_repeated_byte() {
    let data = vec![b'X'; 65536];
    let bytes = compress_to_bytes(&data).unwrap();
    // One bit per symbol
    assert!(bytes.len() < data.len() / 7);
    assert_eq!(decompress_from_bytes(&bytes).unwrap(), data);
}

#[test]
fn test_all_symbols() {
    let data: Vec<u8> = (0..=255).collect();
    let container = compress(&data).unwrap();
    assert_eq!(container.tree().unwrap().leaf_count(), 256);
    assert_eq!(round_trip(&data), data);
}

#[test]
fn test_skewed_input_compresses() {
    let container = compress(b"aaaaaaaaab").unwrap();
    assert!(container.payload().len() < 10);
}

#[test]
fn test_uniform_random_may_expand() {
    // Near-uniform input gains nothing from coding, and the tree section
    // (up to 320 bytes) is pure overhead.
    let data = random_bytes(7, 512);
    let bytes = compress_to_bytes(&data).unwrap();
    assert!(bytes.len() > data.len());
    assert_eq!(decompress_from_bytes(&bytes).unwrap(), data);
}

#[test]
fn test_text_round_trip() {
    let data = b"The quick brown fox jumps over the lazy dog. ".repeat(100);
    let bytes = compress_to_bytes(&data).unwrap();
    assert!(bytes.len() < data.len());
    assert_eq!(decompress_from_bytes(&bytes).unwrap(), data);
}

#[test]
fn test_corruption_never_panics() {
    assert_payload_flips_are_safe(b"AAAAABBBCCD");
    assert_payload_flips_are_safe(b"zzzzzzzz");
    assert_payload_flips_are_safe(b"hello world! this is a test of corrupted payloads");
    assert_payload_flips_are_safe(&random_bytes(3, 300));
}

#[test]
fn test_header_corruption_is_reported() {
    let bytes = compress_to_bytes(b"some text to damage").unwrap();
    for byte in 0..bytes.len() {
        for bit in 0..8 {
            let mut corrupt = bytes.clone();
            corrupt[byte] ^= 1 << bit;
            let declared = u32::from_le_bytes([corrupt[0], corrupt[1], corrupt[2], corrupt[3]]);
            match decompress_from_bytes(&corrupt) {
                Ok(out) => assert_eq!(out.len(), declared as usize),
                Err(Error::Format(_)) | Err(Error::Decode(_)) => {}
                Err(Error::InputTooLarge { size, .. }) => assert_eq!(size, declared as usize),
                Err(other) => panic!("unexpected error kind: {other}"),
            }
        }
    }
    for cut in 0..bytes.len() {
        assert!(decompress_from_bytes(&bytes[..cut]).is_err());
    }
}

#[test]
fn test_parallel_calls() {
    let codec = Codec::default();
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            std::thread::spawn(move || {
                let data = random_bytes(seed, 4096);
                let bytes = codec.compress_to_bytes(&data).unwrap();
                assert_eq!(codec.decompress_from_bytes(&bytes).unwrap(), data);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_block_stream() {
    let codec = Codec::default();
    let mut data = vec![b'X'; 64 * 1024];
    data.extend(random_bytes(11, 10_000));
    data.extend(b"tail text ".repeat(500));

    let stream = compress_blocks(&codec, &data, 16 * 1024).unwrap();
    assert_eq!(decompress_blocks(&codec, &stream).unwrap(), data);
}

#[test]
fn test_block_stream_crc_detection() {
    let codec = Codec::default();
    let mut stream = compress_blocks(&codec, b"test data for crc validation", 8).unwrap();

    let len = stream.len();
    stream[len - 1] ^= 0xFF;

    assert!(matches!(
        decompress_blocks(&codec, &stream),
        Err(Error::Crc { .. })
    ));
}

#[test]
fn test_container_reparse_is_identical() {
    let container = compress(b"reparse me, reparse me").unwrap();
    let reparsed = Container::from_bytes(&container.to_bytes()).unwrap();
    assert_eq!(reparsed.to_bytes(), container.to_bytes());
    assert_eq!(reparsed, container);
}

proptest! {
    #[test]
    fn prop_round_trip(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        prop_assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn prop_round_trip_small_alphabet(data in prop::collection::vec(0u8..4, 0..4096)) {
        prop_assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn prop_deterministic(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        prop_assert_eq!(compress_to_bytes(&data).unwrap(), compress_to_bytes(&data).unwrap());
    }

    #[test]
    fn prop_prefix_free(data in prop::collection::vec(any::<u8>(), 1..1024)) {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();
        prop_assert!(table.is_prefix_free());
        for &byte in &data {
            prop_assert!(table.get(byte).is_some());
        }
    }

    #[test]
    fn prop_weight_invariant(data in prop::collection::vec(any::<u8>(), 1..1024)) {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        prop_assert_eq!(weight_of(tree.root()), data.len() as u64);
    }

    #[test]
    fn prop_payload_bit_flip(
        data in prop::collection::vec(0u8..16, 1..256),
        index in any::<prop::sample::Index>(),
    ) {
        let container = compress(&data).unwrap();
        let mut payload = container.payload().to_vec();
        let bit = index.index(payload.len() * 8);
        payload[bit / 8] ^= 0x80 >> (bit % 8);

        let corrupt = Container::new(
            container.original_len(),
            container.pad_bits(),
            container.tree().cloned(),
            payload,
        );
        match decompress(&corrupt) {
            Ok(out) => prop_assert_eq!(out.len(), data.len()),
            Err(Error::Format(_)) | Err(Error::Decode(_)) => {}
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
