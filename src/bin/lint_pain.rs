//! Lint PAIN documents: separator present, declarations well-formed and used, references resolvable.
//!
//! Usage:
//!   lint_pain [OPTIONS] [FILE.pain ...]
//!   lint_pain < file.pain
//!
//! Files are tidied in place first (indentation, trailing whitespace and blank lines
//! removed), then linted. Stdin is only linted, or printed tidied with `--fix`.
//! Exit code 1 when any error-level finding or unreadable file is reported.

use anyhow::Context;
use clap::Parser;
use pain::lint::{lint, lint_fix, LintMessage, Severity};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "lint_pain", about = "Lint PAIN documents")]
struct Cli {
    /// With stdin: print the tidied source instead of linting it
    #[arg(short, long)]
    fix: bool,
    /// One finding per block instead of one per line
    #[arg(short = 'H', long)]
    human: bool,
    /// Files to tidy and lint (stdin if omitted)
    files: Vec<PathBuf>,
}

/// Prints findings and keeps the tallies that decide the exit code.
struct Reporter {
    human: bool,
    errors: usize,
    warnings: usize,
    unreadable: usize,
}

impl Reporter {
    fn new(human: bool) -> Self {
        Reporter {
            human,
            errors: 0,
            warnings: 0,
            unreadable: 0,
        }
    }

    fn format(&self, source: &str, m: &LintMessage) -> String {
        let severity = match m.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.human {
            format!(
                "{} at {}:{}:{}\n  {}\n  rule: {}",
                severity,
                source,
                m.line,
                m.column,
                m.message,
                m.rule.id()
            )
        } else {
            format!(
                "{}:{}:{}: {}: {} [{}]",
                source,
                m.line,
                m.column,
                severity,
                m.message,
                m.rule.id()
            )
        }
    }

    fn document(&mut self, source: &str, text: &str) {
        for m in lint(text) {
            match m.severity {
                Severity::Error => self.errors += 1,
                Severity::Warning => self.warnings += 1,
            }
            println!("{}", self.format(source, &m));
        }
    }

    fn file(&mut self, path: &Path) {
        match tidy_in_place(path) {
            Ok(text) => self.document(&path.display().to_string(), &text),
            Err(e) => {
                eprintln!("{:#}", e);
                self.unreadable += 1;
            }
        }
    }

    fn failed(&self) -> bool {
        self.errors > 0 || self.unreadable > 0
    }
}

/// Rewrite `path` with [`lint_fix`] applied when that changes it; returns the tidied text.
fn tidy_in_place(path: &Path) -> anyhow::Result<String> {
    let src = std::fs::read_to_string(path).with_context(|| format!("{}: read failed", path.display()))?;
    let tidy = lint_fix(&src);
    if tidy != src {
        std::fs::write(path, &tidy).with_context(|| format!("{}: write failed", path.display()))?;
        debug!(path = %path.display(), "rewrote file");
    }
    Ok(tidy)
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
    let mut reporter = Reporter::new(cli.human);

    if cli.files.is_empty() {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src).context("reading stdin")?;
        if cli.fix {
            io::stdout().write_all(lint_fix(&src).as_bytes())?;
            return Ok(());
        }
        reporter.document("<stdin>", &src);
    } else {
        for path in &cli.files {
            reporter.file(path);
        }
    }

    if reporter.errors + reporter.warnings > 0 {
        eprintln!("lint: {} error(s), {} warning(s)", reporter.errors, reporter.warnings);
    }
    if reporter.failed() {
        std::process::exit(1);
    }
    Ok(())
}
