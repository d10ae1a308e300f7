// Chunk: docs/chunks/viewer_cli - Load, edit and print a file through the gap buffer

//! gapline: load text into a gap buffer, apply edits, write it back out.
//!
//! This is thin glue around [`gapline_buffer::GapBuffer`]. Input is streamed
//! into the buffer through its insertion adapter and output is pulled back
//! out chunk by chunk with [`GapBuffer::chunk_at`], the same way an
//! incremental parser reads the buffer.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gapline_buffer::GapBuffer;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// gapline CLI arguments
///
/// Examples:
///   gapline notes.txt                          # Print a file
///   gapline --erase 0..6 notes.txt             # Drop the first six bytes
///   gapline --insert-at 0 --text '# ' notes.txt
///   cat notes.txt | gapline --stats            # Read stdin, report layout
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "gapline",
    version,
    about = "Load text into a gap buffer, edit it, and print the result"
)]
pub struct CliArgs {
    /// File to load. Reads stdin when absent or `-`.
    pub file: Option<PathBuf>,

    /// Byte offset to insert `--text` at (applied after `--erase`).
    #[clap(long = "insert-at", value_name = "OFFSET", requires = "text")]
    pub insert_at: Option<usize>,

    /// Text to insert at `--insert-at`.
    #[clap(long, value_name = "TEXT", requires = "insert_at")]
    pub text: Option<String>,

    /// Byte range to erase, written `FROM..TO`.
    #[clap(long, value_name = "FROM..TO", value_parser = parse_range)]
    pub erase: Option<Range<usize>>,

    /// Print buffer size, capacity and gap to stderr when done.
    #[clap(long)]
    pub stats: bool,

    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` wins if set.
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parses a `FROM..TO` byte range.
pub fn parse_range(value: &str) -> Result<Range<usize>, String> {
    let (from, to) = value
        .split_once("..")
        .ok_or_else(|| format!("expected FROM..TO, got `{value}`"))?;
    let from: usize = from
        .trim()
        .parse()
        .map_err(|err| format!("invalid range start `{from}`: {err}"))?;
    let to: usize = to
        .trim()
        .parse()
        .map_err(|err| format!("invalid range end `{to}`: {err}"))?;
    if from > to {
        return Err(format!("range start {from} is after end {to}"));
    }
    Ok(from..to)
}

/// Installs the stderr log subscriber.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Layout of the buffer after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferStats {
    pub len: usize,
    pub capacity: usize,
    pub gap_position: usize,
    pub gap_len: usize,
}

impl BufferStats {
    pub fn of(buffer: &GapBuffer) -> Self {
        Self {
            len: buffer.len(),
            capacity: buffer.capacity(),
            gap_position: buffer.gap_position(),
            gap_len: buffer.gap_len(),
        }
    }
}

impl fmt::Display for BufferStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "len={} capacity={} gap={}..{}",
            self.len,
            self.capacity,
            self.gap_position,
            self.gap_position + self.gap_len
        )
    }
}

/// Streams `input` into a fresh buffer.
pub fn load<R: Read>(mut input: R) -> Result<GapBuffer> {
    let mut buffer = GapBuffer::new();
    let at = buffer.gap();
    let mut inserter = buffer.inserter(at)?;
    let copied = io::copy(&mut input, &mut inserter).context("failed to read input")?;
    debug!(bytes = copied, "loaded input");
    Ok(buffer)
}

fn load_path(path: Option<&Path>) -> Result<GapBuffer> {
    match path {
        None => load(io::stdin().lock()),
        Some(path) if path == Path::new("-") => load(io::stdin().lock()),
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            load(file).with_context(|| format!("failed to load {}", path.display()))
        }
    }
}

/// Applies the erase and insert requested on the command line, in that order.
pub fn apply_edits(buffer: &mut GapBuffer, args: &CliArgs) -> Result<()> {
    if let Some(range) = &args.erase {
        let from = buffer
            .cursor_at(range.start)
            .with_context(|| format!("erase start {} is past the end", range.start))?;
        let to = buffer
            .cursor_at(range.end)
            .with_context(|| format!("erase end {} is past the end", range.end))?;
        buffer.erase(from, to)?;
        info!(from = range.start, to = range.end, "erased range");
    }

    if let (Some(offset), Some(text)) = (args.insert_at, &args.text) {
        let at = buffer
            .cursor_at(offset)
            .with_context(|| format!("insert offset {offset} is past the end"))?;
        let inserted = buffer.inserter(at)?.extend_from(text.bytes())?;
        info!(offset, bytes = inserted, "inserted text");
    }
    Ok(())
}

/// Writes the buffer out by pulling contiguous chunks from it. Returns the
/// number of bytes written.
pub fn write_chunks<W: Write>(buffer: &GapBuffer, mut output: W) -> io::Result<usize> {
    let mut offset = 0;
    loop {
        let chunk = buffer.chunk_at(offset);
        if chunk.is_empty() {
            break;
        }
        output.write_all(chunk)?;
        offset += chunk.len();
    }
    output.flush()?;
    Ok(offset)
}

/// Loads the input named by `args`, applies its edits and writes the result.
pub fn run<W: Write>(args: &CliArgs, output: W) -> Result<BufferStats> {
    let mut buffer = load_path(args.file.as_deref())?;
    apply_edits(&mut buffer, args)?;
    write_chunks(&buffer, output).context("failed to write output")?;
    Ok(BufferStats::of(&buffer))
}
