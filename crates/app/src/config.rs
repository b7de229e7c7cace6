//! Configuration for the huffpack command-line tool.
//!
//! Parses command-line arguments into a `Config`. Every option has a
//! default, so `huffpack roundtrip` works with no further arguments; output
//! paths default to the `.huffman` suffix convention.

use huffpack_core::codec::DEFAULT_MAX_INPUT_BYTES;
use huffpack_core::CodecConfig;
use std::path::{Path, PathBuf};

/// Suffix appended to compressed files.
pub const COMPRESSED_SUFFIX: &str = "huffman";

/// What the tool should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// File -> container (or block stream)
    Compress,
    /// Container (or block stream) -> file
    Decompress,
    /// Generate sample data and check it survives a round trip
    Roundtrip,
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    // === Files ===
    /// Input file path (None only for roundtrip)
    pub input_file: Option<PathBuf>,

    /// Output file path (None only for roundtrip)
    pub output_file: Option<PathBuf>,

    // === Codec ===
    /// Block size in bytes when compressing; 0 writes a single bare
    /// container. Decompression detects the layout on its own.
    pub block_bytes: usize,

    /// Codec limits
    pub codec: CodecConfig,

    // === Sample data ===
    /// Seed for sample generation
    pub seed: u64,

    /// Size of generated sample
    pub sample_bytes: usize,

    // === Behavior ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name
    /// excluded).
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn from_args(args: &[String]) -> Result<Option<Self>, String> {
        let Some(first) = args.first() else {
            return Err("missing command (compress, decompress or roundtrip)".to_string());
        };
        let command = match first.as_str() {
            "compress" => Command::Compress,
            "decompress" => Command::Decompress,
            "roundtrip" => Command::Roundtrip,
            "--help" | "-h" | "help" => return Ok(None),
            other => return Err(format!("unknown command: {other}")),
        };

        let mut input_file: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut block_bytes: usize = 0;
        let mut max_input: usize = DEFAULT_MAX_INPUT_BYTES;
        let mut seed: Option<u64> = None;
        let mut sample_bytes: usize = 256 * 1024;
        let mut print_config = false;
        let mut print_metrics = true;

        let mut rest = args[1..].iter();
        while let Some(arg) = rest.next() {
            match arg.as_str() {
                "--in" => input_file = Some(PathBuf::from(value(&mut rest, "--in", "a path")?)),
                "--out" => output_file = Some(PathBuf::from(value(&mut rest, "--out", "a path")?)),
                "--block-bytes" => block_bytes = number(&mut rest, "--block-bytes")?,
                "--max-input" => max_input = number(&mut rest, "--max-input")?,
                "--seed" => seed = Some(number(&mut rest, "--seed")?),
                "--sample-bytes" => sample_bytes = number(&mut rest, "--sample-bytes")?,
                "--print-config" => print_config = true,
                "--no-metrics" => print_metrics = false,
                "--help" | "-h" => return Ok(None),
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        if max_input == 0 {
            return Err("--max-input must be greater than zero".to_string());
        }

        if command != Command::Roundtrip {
            let input = input_file
                .as_deref()
                .ok_or_else(|| format!("{} requires --in <PATH>", command.name()))?;
            if output_file.is_none() {
                output_file = Some(default_output(command, input));
            }
        }

        // Time-based seed when none was given
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        Ok(Some(Config {
            command,
            input_file,
            output_file,
            block_bytes,
            codec: CodecConfig {
                max_input_bytes: max_input,
            },
            seed,
            sample_bytes,
            print_config,
            print_metrics,
        }))
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Command:     {}", self.command.name());
        println!("Input file:  {}", display_path(self.input_file.as_deref(), "(generate sample)"));
        println!("Output file: {}", display_path(self.output_file.as_deref(), "(none)"));
        println!();
        if self.block_bytes == 0 {
            println!("Blocks: off (single container)");
        } else {
            println!("Block size: {} bytes ({} KiB)", self.block_bytes, self.block_bytes / 1024);
        }
        println!("Max input: {} bytes", self.codec.max_input_bytes);
        if self.command == Command::Roundtrip {
            println!();
            println!("=== Sample ===");
            println!("Seed: {}", self.seed);
            println!("Size: {} bytes", self.sample_bytes);
        }
        println!();
    }
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Compress => "compress",
            Command::Decompress => "decompress",
            Command::Roundtrip => "roundtrip",
        }
    }
}

/// `<in>.huffman` when compressing; `<in>` without `.huffman` (or
/// `<in>.out`) when decompressing.
pub fn default_output(command: Command, input: &Path) -> PathBuf {
    match command {
        Command::Decompress
            if input.extension().and_then(|e| e.to_str()) == Some(COMPRESSED_SUFFIX) =>
        {
            input.with_extension("")
        }
        Command::Decompress => append_suffix(input, "out"),
        _ => append_suffix(input, COMPRESSED_SUFFIX),
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn display_path(path: Option<&Path>, fallback: &str) -> String {
    path.map_or_else(|| fallback.to_string(), |p| p.display().to_string())
}

fn value<'a>(
    rest: &mut impl Iterator<Item = &'a String>,
    flag: &str,
    what: &str,
) -> Result<&'a str, String> {
    rest.next()
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires {what}"))
}

fn number<'a, T: std::str::FromStr>(
    rest: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<T, String> {
    let raw = value(rest, flag, "a number")?;
    raw.parse()
        .map_err(|_| format!("invalid value for {flag}: {raw}"))
}

pub fn print_help() {
    println!("huffpack: lossless Huffman compression");
    println!();
    println!("USAGE:");
    println!("    huffpack <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    compress                Compress --in into --out");
    println!("    decompress              Decompress --in into --out");
    println!("    roundtrip               Compress and decompress generated sample data");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>             Input file (required for compress/decompress)");
    println!("    --out <PATH>            Output file");
    println!("                            (default: <in>.huffman, or <in> minus .huffman)");
    println!("    --block-bytes <N>       Split into checksummed blocks of N bytes");
    println!("                            (default: 0 = off)");
    println!("    --max-input <N>         Largest uncompressed size accepted (default: 268435456)");
    println!();
    println!("    --seed <N>              Sample seed for roundtrip (default: time-based)");
    println!("    --sample-bytes <N>      Sample size for roundtrip (default: 262144)");
    println!();
    println!("    --print-config          Print resolved configuration");
    println!("    --no-metrics            Don't print metrics summary");
    println!("    --help, -h              Print this help");
    println!();
    println!("Set RUST_LOG=debug for codec tracing.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn parse(list: &[&str]) -> Result<Option<Config>, String> {
        Config::from_args(&args(list))
    }

    #[test]
    fn test_compress_defaults() {
        let config = parse(&["compress", "--in", "notes.txt"]).unwrap().unwrap();
        assert_eq!(config.command, Command::Compress);
        assert_eq!(config.output_file, Some(PathBuf::from("notes.txt.huffman")));
        assert_eq!(config.block_bytes, 0);
        assert_eq!(config.codec.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
        assert!(config.print_metrics);
    }

    #[test]
    fn test_decompress_strips_suffix() {
        let config = parse(&["decompress", "--in", "notes.txt.huffman"]).unwrap().unwrap();
        assert_eq!(config.output_file, Some(PathBuf::from("notes.txt")));

        let config = parse(&["decompress", "--in", "blob.bin"]).unwrap().unwrap();
        assert_eq!(config.output_file, Some(PathBuf::from("blob.bin.out")));
    }

    #[test]
    fn test_explicit_options() {
        let config = parse(&[
            "compress",
            "--in",
            "a",
            "--out",
            "b",
            "--block-bytes",
            "4096",
            "--max-input",
            "1000000",
            "--no-metrics",
            "--print-config",
        ])
        .unwrap()
        .unwrap();
        assert_eq!(config.output_file, Some(PathBuf::from("b")));
        assert_eq!(config.block_bytes, 4096);
        assert_eq!(config.codec.max_input_bytes, 1_000_000);
        assert!(!config.print_metrics);
        assert!(config.print_config);
    }

    #[test]
    fn test_roundtrip_needs_no_paths() {
        let config = parse(&["roundtrip", "--seed", "42", "--sample-bytes", "100"])
            .unwrap()
            .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.sample_bytes, 100);
        assert!(config.input_file.is_none());
        assert!(config.output_file.is_none());
    }

    #[test]
    fn test_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["explode"]).is_err());
        assert!(parse(&["compress"]).is_err());
        assert!(parse(&["compress", "--in"]).is_err());
        assert!(parse(&["roundtrip", "--seed", "abc"]).is_err());
        assert!(parse(&["roundtrip", "--bogus"]).is_err());
        assert!(parse(&["roundtrip", "--max-input", "0"]).is_err());
    }

    #[test]
    fn test_help() {
        assert!(parse(&["--help"]).unwrap().is_none());
        assert!(parse(&["compress", "-h"]).unwrap().is_none());
    }
}
