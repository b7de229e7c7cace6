//! Metrics collection and reporting for codec runs.
//!
//! Tracks throughput (bytes in/out), how compressed output splits between
//! header and payload, and timing.
//!
//! # Thread Safety
//!
//! `Metrics` is a plain struct updated by the caller. For multi-threaded
//! use, keep one per thread and `merge` them at the end.

use std::time::{Duration, Instant};

use crate::container::{Container, HEADER_SIZE};

/// Byte counts and timing for one or more compress/decompress calls.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Input/Output ===
    /// Uncompressed bytes seen
    pub input_bytes: u64,

    /// Compressed bytes produced or consumed
    pub output_bytes: u64,

    // === Containers ===
    /// Containers (blocks) processed
    pub containers: u64,

    /// Bytes spent on fixed headers and tree sections
    pub header_bytes: u64,

    /// Bytes spent on packed payload
    pub payload_bytes: u64,

    /// Distinct symbols summed over all containers
    pub distinct_symbols: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            output_bytes: 0,
            containers: 0,
            header_bytes: 0,
            payload_bytes: 0,
            distinct_symbols: 0,
        }
    }

    /// Account for one container and the raw bytes it describes.
    pub fn record_container(&mut self, container: &Container) {
        let tree_bytes = container.tree().map_or(0, |tree| tree.serialize().len());

        self.containers += 1;
        self.input_bytes += u64::from(container.original_len());
        self.header_bytes += (HEADER_SIZE + tree_bytes) as u64;
        self.payload_bytes += container.payload().len() as u64;
        self.distinct_symbols += container.tree().map_or(0, |tree| tree.leaf_count()) as u64;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compute compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if no data was seen. Values above 1.0 mean the data
    /// expanded, which is normal for near-uniform input.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Average payload bits per input byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            (self.payload_bytes * 8) as f64 / self.input_bytes as f64
        }
    }

    /// Compute throughput in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / duration_secs
        }
    }

    /// Fold another set of counters into this one.
    pub fn merge(&mut self, other: &Metrics) {
        self.input_bytes += other.input_bytes;
        self.output_bytes += other.output_bytes;
        self.containers += other.containers;
        self.header_bytes += other.header_bytes;
        self.payload_bytes += other.payload_bytes;
        self.distinct_symbols += other.distinct_symbols;
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Codec Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!(
            "Uncompressed: {} bytes ({:.2} MiB)",
            self.input_bytes,
            self.input_bytes as f64 / 1024.0 / 1024.0
        );
        println!(
            "Compressed:   {} bytes ({:.2} MiB)",
            self.output_bytes,
            self.output_bytes as f64 / 1024.0 / 1024.0
        );
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();
        println!("=== Containers ===");
        println!("Containers: {}", self.containers);
        println!("Header bytes: {}", self.header_bytes);
        println!("Payload bytes: {}", self.payload_bytes);
        println!("Bits per symbol: {:.3}", self.bits_per_symbol());
        println!();
        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             containers={}\n\
             header_bytes={}\n\
             payload_bytes={}\n\
             compression_ratio={:.4}\n\
             bits_per_symbol={:.4}\n",
            self.duration().as_millis(),
            self.input_bytes,
            self.output_bytes,
            self.containers,
            self.header_bytes,
            self.payload_bytes,
            self.compression_ratio(),
            self.bits_per_symbol(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
