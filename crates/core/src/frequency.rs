//! Symbol frequency counting.

/// Occurrence counts for every byte value in one input.
///
/// Built once per input and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Count every byte of `data`. An empty slice yields an empty table.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    /// Occurrences of `symbol`.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// `(symbol, count)` pairs with a non-zero count, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Number of symbols that occur at least once.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Sum of all counts (the input length).
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.distinct_symbols() == 0
    }
}
