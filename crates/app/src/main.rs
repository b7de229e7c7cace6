//! huffpack: command-line front end for huffpack-core.
//!
//! Reads a file, hands the bytes to the codec and writes the result. All
//! codec logic lives in the core crate.

mod config;
mod input_gen;

use config::{Command, Config};
use huffpack_core::framing::{compress_blocks_recorded, decompress_blocks_recorded, is_block_stream};
use huffpack_core::metrics::Metrics;
use huffpack_core::{Codec, Container, Error, Result};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(Some(config)) => config,
        Ok(None) => {
            config::print_help();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(metrics) => {
            if config.print_metrics {
                metrics.print_summary();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{} failed: {e}", config.command.name());
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<Metrics> {
    let codec = Codec::new(config.codec);
    let mut metrics = Metrics::new();

    match config.command {
        Command::Compress => {
            let (input, output) = paths(config)?;
            let data = std::fs::read(input)?;
            let compressed = compress(&codec, &data, config.block_bytes, &mut metrics)?;
            std::fs::write(output, &compressed)?;
            log::info!(
                "compressed {} ({} bytes) -> {} ({} bytes)",
                input.display(),
                data.len(),
                output.display(),
                compressed.len()
            );
        }
        Command::Decompress => {
            let (input, output) = paths(config)?;
            let compressed = std::fs::read(input)?;
            let data = decompress(&codec, &compressed, &mut metrics)?;
            std::fs::write(output, &data)?;
            log::info!(
                "decompressed {} ({} bytes) -> {} ({} bytes)",
                input.display(),
                compressed.len(),
                output.display(),
                data.len()
            );
        }
        Command::Roundtrip => {
            let data = input_gen::generate_sample_data(config.seed, config.sample_bytes);
            log::info!("generated {} sample bytes (seed {})", data.len(), config.seed);

            let compressed = compress(&codec, &data, config.block_bytes, &mut metrics)?;
            let restored = decompress(&codec, &compressed, &mut Metrics::new())?;
            verify_round_trip(&data, &restored)?;
            log::info!("round trip verified");
        }
    }

    metrics.complete();
    Ok(metrics)
}

/// Compress as one container, or as a block stream when `block_bytes > 0`.
fn compress(
    codec: &Codec,
    data: &[u8],
    block_bytes: usize,
    metrics: &mut Metrics,
) -> Result<Vec<u8>> {
    let bytes = if block_bytes == 0 {
        let container = codec.compress(data)?;
        metrics.record_container(&container);
        container.to_bytes()
    } else {
        compress_blocks_recorded(codec, data, block_bytes, metrics)?
    };
    metrics.output_bytes += bytes.len() as u64;
    Ok(bytes)
}

/// Decompress a bare container or a block stream, whichever `bytes` holds.
///
/// Zero bytes is the block stream of an empty input.
fn decompress(codec: &Codec, bytes: &[u8], metrics: &mut Metrics) -> Result<Vec<u8>> {
    let data = if bytes.is_empty() || is_block_stream(bytes) {
        decompress_blocks_recorded(codec, bytes, metrics)?
    } else {
        let container = Container::from_bytes(bytes)?;
        metrics.record_container(&container);
        codec.decompress(&container)?
    };
    metrics.output_bytes += bytes.len() as u64;
    Ok(data)
}

/// Check that `restored` is exactly `original`.
fn verify_round_trip(original: &[u8], restored: &[u8]) -> Result<()> {
    let shorter = original.len().min(restored.len());
    let offset = original
        .iter()
        .zip(restored)
        .position(|(a, b)| a != b)
        .or_else(|| (original.len() != restored.len()).then_some(shorter));

    match offset {
        Some(offset) => Err(Error::RoundTripMismatch {
            offset,
            input_len: original.len(),
            output_len: restored.len(),
        }),
        None => Ok(()),
    }
}

fn paths(config: &Config) -> Result<(&Path, &Path)> {
    match (config.input_file.as_deref(), config.output_file.as_deref()) {
        (Some(input), Some(output)) => Ok((input, output)),
        _ => Err(Error::Config(format!(
            "{} needs input and output paths",
            config.command.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_round_trip() {
        assert!(verify_round_trip(b"abc", b"abc").is_ok());
        assert!(verify_round_trip(b"", b"").is_ok());

        assert!(matches!(
            verify_round_trip(b"abcd", b"abXd"),
            Err(Error::RoundTripMismatch {
                offset: 2,
                input_len: 4,
                output_len: 4
            })
        ));
        assert!(matches!(
            verify_round_trip(b"abcd", b"ab"),
            Err(Error::RoundTripMismatch {
                offset: 2,
                input_len: 4,
                output_len: 2
            })
        ));
    }

    #[test]
    fn test_block_and_bare_round_trips() {
        let codec = Codec::default();
        let data = input_gen::generate_sample_data(5, 20_000);
        for block_bytes in [0, 4096] {
            let mut metrics = Metrics::new();
            let compressed = compress(&codec, &data, block_bytes, &mut metrics).unwrap();
            let restored = decompress(&codec, &compressed, &mut Metrics::new()).unwrap();
            assert!(verify_round_trip(&data, &restored).is_ok());
        }
    }

    #[test]
    fn test_empty_file_is_empty_stream() {
        let codec = Codec::default();
        let restored = decompress(&codec, &[], &mut Metrics::new()).unwrap();
        assert!(restored.is_empty());
    }
}
