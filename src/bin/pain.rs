//! Convert between PAIN and JSON.
//!
//! Usage:
//!   pain decode [FILE] [-o OUT]     PAIN → JSON
//!   pain encode [FILE] [-o OUT]     JSON → PAIN
//!   pain explain [FILE]             show each assignment with its resolved path
//!
//! Reads stdin when no file is given and writes stdout unless `-o` is set.
//! Logging goes to stderr; set `RUST_LOG=pain=debug` for details.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pain::codec::{Codec, LinePolicy, Options};
use pain::dump;
use pain::value::ScalarPolicy;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "pain", version, about = "Convert between PAIN notation and JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode PAIN text into JSON
    Decode {
        #[command(flatten)]
        io: InOut,
        /// Fail on body lines that match no grammar instead of skipping them
        #[arg(long)]
        strict: bool,
        /// Fail when the `§` separator line is missing
        #[arg(long)]
        require_separator: bool,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
    /// Encode JSON into PAIN text
    Encode {
        #[command(flatten)]
        io: InOut,
        /// Reject numbers and booleans instead of encoding their text form
        #[arg(long)]
        strings_only: bool,
    },
    /// Decode and print every applied assignment with its absolute path, then the tree
    Explain {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InOut {
    /// Input file (stdin if omitted)
    input: Option<PathBuf>,
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s).context("reading stdin")?;
            Ok(s)
        }
    }
}

fn write_output(path: Option<&PathBuf>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, text).with_context(|| format!("writing {}", p.display()))?;
            info!(path = %p.display(), bytes = text.len(), "wrote output");
            Ok(())
        }
        None => {
            let mut out = io::stdout().lock();
            out.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                out.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Decode {
            io,
            strict,
            require_separator,
            compact,
        } => {
            let codec = Codec::new(Options {
                malformed_lines: if strict { LinePolicy::Reject } else { LinePolicy::Skip },
                require_separator,
                pretty: !compact,
                ..Options::default()
            });
            let text = read_input(io.input.as_ref())?;
            let json = codec.decode_to_json(&text)?;
            write_output(io.output.as_ref(), &json)
        }
        Command::Encode { io, strings_only } => {
            let codec = Codec::new(Options {
                scalars: if strings_only { ScalarPolicy::Reject } else { ScalarPolicy::Stringify },
                ..Options::default()
            });
            let text = read_input(io.input.as_ref())?;
            let pain = codec.encode_json(&text)?;
            write_output(io.output.as_ref(), &pain)
        }
        Command::Explain { input } => {
            let text = read_input(input.as_ref())?;
            let (tree, applied) = Codec::default().decode_traced(&text)?;
            let report = format!("{}\n\n{}", dump::explain(&applied), dump::value_to_dump(&tree, 0));
            write_output(None, &report)
        }
    }
}
