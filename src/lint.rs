//! Linter for PAIN documents.
//!
//! ## Rules
//!
//! - **missing-separator** (error): no line consisting only of `§`.
//! - **malformed-declaration** (warning): a header line that is not `§<id> <text>`; the decoder ignores it.
//! - **duplicate-declaration** (warning): an id declared twice; the last one wins.
//! - **malformed-line** (error): a body line that is not `<path> = <target>`.
//! - **unresolved-reference** (error): a body line refers to an undeclared id.
//! - **relative-first-line** (error): the first assignment starts with a dot.
//! - **unused-declaration** (warning): a declared id no assignment refers to.
//! - **trailing-whitespace** (warning).
//!
//! Run the linter via the `lint_pain` binary: `cargo run --bin lint_pain -- doc.pain`
//! or pipe: `lint_pain < doc.pain`. Exit code 1 if any error-level findings.

use crate::ast::{Id, Segment, Target};
use crate::frame;
use crate::parser::{self, LineError};
use std::collections::{HashMap, HashSet};

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Identifies which rule produced the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintRule {
    MissingSeparator,
    MalformedDeclaration,
    DuplicateDeclaration,
    MalformedLine,
    UnresolvedReference,
    RelativeFirstLine,
    UnusedDeclaration,
    TrailingWhitespace,
}

impl LintRule {
    pub fn id(self) -> &'static str {
        match self {
            LintRule::MissingSeparator => "missing-separator",
            LintRule::MalformedDeclaration => "malformed-declaration",
            LintRule::DuplicateDeclaration => "duplicate-declaration",
            LintRule::MalformedLine => "malformed-line",
            LintRule::UnresolvedReference => "unresolved-reference",
            LintRule::RelativeFirstLine => "relative-first-line",
            LintRule::UnusedDeclaration => "unused-declaration",
            LintRule::TrailingWhitespace => "trailing-whitespace",
        }
    }
}

/// A single lint message with location.
#[derive(Debug, Clone)]
pub struct LintMessage {
    pub line: usize,
    pub column: usize,
    pub rule: LintRule,
    pub severity: Severity,
    pub message: String,
}

fn message(line: usize, column: usize, rule: LintRule, severity: Severity, text: String) -> LintMessage {
    LintMessage {
        line,
        column,
        rule,
        severity,
        message: text,
    }
}

/// Run all lint rules on PAIN source. Returns messages in line order.
pub fn lint(source: &str) -> Vec<LintMessage> {
    let mut out = Vec::new();

    for (i, line) in source.lines().enumerate() {
        let trimmed = line.trim_end();
        if line != trimmed {
            out.push(message(
                i + 1,
                trimmed.chars().count() + 1,
                LintRule::TrailingWhitespace,
                Severity::Warning,
                "trailing whitespace not allowed".to_string(),
            ));
        }
    }

    let framed = frame::split(source);
    if framed.separator.is_none() {
        out.push(message(
            source.lines().count().max(1),
            1,
            LintRule::MissingSeparator,
            Severity::Error,
            "missing section separator (a line containing only `§`)".to_string(),
        ));
    }

    // id -> line of the declaration that wins
    let mut declared: HashMap<Id, usize> = HashMap::new();
    for line in &framed.header {
        match parser::parse_declaration(line.text) {
            Some(decl) => {
                if let Some(prev) = declared.insert(decl.id, line.number) {
                    out.push(message(
                        line.number,
                        1,
                        LintRule::DuplicateDeclaration,
                        Severity::Warning,
                        format!("§{} already declared on line {}; this one wins", decl.id, prev),
                    ));
                }
            }
            None => out.push(message(
                line.number,
                1,
                LintRule::MalformedDeclaration,
                Severity::Warning,
                format!("`{}` is not a declaration and is ignored", line.text),
            )),
        }
    }

    let mut used: HashSet<Id> = HashSet::new();
    let mut seen_assignment = false;
    for line in &framed.body {
        let assignment = match parser::parse_assignment(line.text) {
            Ok(a) => a,
            Err(LineError::Malformed(reason)) | Err(LineError::Path(reason)) => {
                out.push(message(line.number, 1, LintRule::MalformedLine, Severity::Error, reason));
                continue;
            }
            Err(LineError::IdOutOfRange(reason)) => {
                out.push(message(line.number, 1, LintRule::UnresolvedReference, Severity::Error, reason));
                continue;
            }
        };
        if !seen_assignment && assignment.path.is_relative() {
            out.push(message(
                line.number,
                1,
                LintRule::RelativeFirstLine,
                Severity::Error,
                "first assignment must use an absolute path".to_string(),
            ));
        }
        seen_assignment = true;

        let mut refs: Vec<Id> = assignment
            .path
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Key(id) => Some(*id),
                _ => None,
            })
            .collect();
        if let Target::Value(id) = assignment.target {
            refs.push(id);
        }
        for id in refs {
            used.insert(id);
            if !declared.contains_key(&id) {
                out.push(message(
                    line.number,
                    1,
                    LintRule::UnresolvedReference,
                    Severity::Error,
                    format!("§{} is not declared", id),
                ));
            }
        }
    }

    for (&id, &line) in &declared {
        if !used.contains(&id) {
            out.push(message(
                line,
                1,
                LintRule::UnusedDeclaration,
                Severity::Warning,
                format!("§{} is declared but never used", id),
            ));
        }
    }

    out.sort_by_key(|m| (m.line, m.column));
    out
}

/// Fix PAIN source: strip indentation and trailing whitespace, drop blank lines.
pub fn lint_fix(source: &str) -> String {
    let mut out = String::new();
    for line in source.lines() {
        let line = frame::trim_line(line);
        if line.is_empty() {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
