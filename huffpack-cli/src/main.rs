//! Command-line interface for the huffpack codec.
//!
//! Thin glue only: file opening, permission capture and re-application, and
//! the optional statistics report all live here; every byte of compression
//! logic belongs to the `huffpack` library.

use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

/// Mode bits recorded when the input is stdin and no source file exists.
const DEFAULT_MODE: u16 = 0o644;

#[derive(Debug, Parser)]
#[clap(name = "huffpack", version, about = "Huffman byte-stream compressor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compress a file with Huffman coding.
    Encode(IoArgs),
    /// Decompress a huffpack stream.
    Decode(IoArgs),
}

#[derive(Debug, Args)]
struct IoArgs {
    /// Input file; reads stdin when omitted.
    #[clap(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output file; writes stdout when omitted.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,

    /// Print compression statistics to stderr.
    #[clap(short = 'v', long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    setup_logging();

    match Cli::parse().command {
        Command::Encode(args) => run_encode(args),
        Command::Decode(args) => run_decode(args),
    }
}

/// Installs a stderr fmt subscriber so piped stdout stays clean; `RUST_LOG`
/// overrides the default directive.
fn setup_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let main_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(main_layer)
        .init()
}

fn run_encode(args: IoArgs) -> anyhow::Result<()> {
    let mut output = open_output(args.output.as_deref())?;

    let summary = match &args.input {
        Some(path) => {
            let input = File::open(path)
                .with_context(|| format!("could not open input file {}", path.display()))?;
            let permissions = file_mode(&input)?;
            huffpack::encode(input, &mut output, permissions)?
        }
        None => {
            // The encoder scans its input twice, so stdin is buffered into
            // a seekable cursor first.
            let mut buffered = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buffered)
                .context("could not read stdin")?;
            huffpack::encode(Cursor::new(buffered), &mut output, DEFAULT_MODE)?
        }
    };

    if args.verbose {
        eprintln!("Uncompressed file size: {}", summary.bytes_read);
        eprintln!("Compressed file size: {}", summary.bytes_written);
        eprintln!(
            "Space saving: {:.2}%",
            space_saving(summary.bytes_read, summary.bytes_written)
        );
    }
    Ok(())
}

fn run_decode(args: IoArgs) -> anyhow::Result<()> {
    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(
            File::open(path)
                .with_context(|| format!("could not open input file {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };
    let mut output = open_output(args.output.as_deref())?;

    let summary = huffpack::decode(input, &mut output)?;

    // Re-apply the source file's mode bits, best-effort: a failure here
    // must not discard an already-decoded stream.
    if let Some(path) = &args.output {
        apply_mode(path, summary.permissions);
    }

    if args.verbose {
        eprintln!("Compressed file size: {}", summary.bytes_read);
        eprintln!("Decompressed file size: {}", summary.bytes_written);
        eprintln!(
            "Space saving: {:.2}%",
            space_saving(summary.bytes_written, summary.bytes_read)
        );
    }
    Ok(())
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("could not create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    })
}

/// Percentage of space saved by compression; zero for an empty original.
fn space_saving(uncompressed: u64, compressed: u64) -> f64 {
    if uncompressed == 0 {
        return 0.0;
    }
    100.0 * (1.0 - compressed as f64 / uncompressed as f64)
}

#[cfg(unix)]
fn file_mode(file: &File) -> anyhow::Result<u16> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = file.metadata().context("could not stat input file")?;
    Ok((metadata.permissions().mode() & 0o7777) as u16)
}

#[cfg(not(unix))]
fn file_mode(_file: &File) -> anyhow::Result<u16> {
    Ok(DEFAULT_MODE)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u16) {
    use std::os::unix::fs::PermissionsExt;

    let permissions = std::fs::Permissions::from_mode(mode as u32);
    if let Err(error) = std::fs::set_permissions(path, permissions) {
        tracing::warn!(%error, path = %path.display(), "could not apply source permissions");
    }
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u16) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let cli = Cli::try_parse_from(["huffpack", "encode", "-i", "in.txt", "-o", "out.hp", "-v"])
            .unwrap();
        let Command::Encode(args) = cli.command else {
            panic!("expected the encode subcommand");
        };
        assert_eq!(args.input.as_deref(), Some(Path::new("in.txt")));
        assert_eq!(args.output.as_deref(), Some(Path::new("out.hp")));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_default_to_stdio() {
        let cli = Cli::try_parse_from(["huffpack", "decode"]).unwrap();
        let Command::Decode(args) = cli.command else {
            panic!("expected the decode subcommand");
        };
        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_space_saving() {
        assert_eq!(space_saving(100, 25), 75.0);
        assert_eq!(space_saving(0, 19), 0.0);
        assert!(space_saving(10, 20) < 0.0);
    }
}
