//! Sample data for the `roundtrip` command.
//!
//! Generated data mixes sections that Huffman coding handles very
//! differently, so the metrics show both wins and losses:
//! - single-byte runs (one bit per symbol)
//! - text with a skewed letter distribution
//! - a four-symbol alphabet
//! - uniform random bytes (expands slightly)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Letters weighted roughly like English text; repeats raise frequency.
const SKEWED_TEXT: &[u8] = b"eeeeeeeeeeeetttttttttaaaaaaaaooooooooiiiiiiinnnnnnn\
    sssssshhhhhhrrrrrrddddllllccuummwwffggyyppbbvk          ..,,\n";

/// Generate `size_bytes` of mixed-compressibility data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(rng.gen_range(1024..=8192));

        match rng.gen_range(0..10u8) {
            // 20% runs
            0..=1 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(section));
            }

            // 40% skewed text
            2..=5 => {
                for _ in 0..section {
                    data.push(SKEWED_TEXT[rng.gen_range(0..SKEWED_TEXT.len())]);
                }
            }

            // 20% tiny alphabet
            6..=7 => {
                let alphabet: [u8; 4] = rng.gen();
                for _ in 0..section {
                    data.push(alphabet[rng.gen_range(0..4)]);
                }
            }

            // 20% incompressible
            _ => {
                for _ in 0..section {
                    data.push(rng.gen());
                }
            }
        }
    }

    data
}
