//! Line framing: split PAIN text into header and body sections, and render them back.
//!
//! The first line consisting only of `§` separates the header (declarations) from the
//! body (assignments). Indentation and trailing whitespace are not significant.

use crate::ast::{Assignment, Declaration};
use crate::declarations::escape;

/// The section separator line.
pub const SEPARATOR: &str = "§";

/// A trimmed, non-empty input line and its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberedLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// PAIN text split into its two sections.
#[derive(Debug, Clone, Default)]
pub struct Framed<'a> {
    pub header: Vec<NumberedLine<'a>>,
    pub body: Vec<NumberedLine<'a>>,
    /// Line number of the separator, if one was found.
    pub separator: Option<usize>,
}

/// Split `text` into header and body lines. Without a separator everything is header.
pub fn split(text: &str) -> Framed<'_> {
    let mut framed = Framed::default();
    for (i, raw) in text.lines().enumerate() {
        let line = trim_line(raw);
        if line.is_empty() {
            continue;
        }
        let numbered = NumberedLine { number: i + 1, text: line };
        if framed.separator.is_some() {
            framed.body.push(numbered);
        } else if line == SEPARATOR {
            framed.separator = Some(numbered.number);
        } else {
            framed.header.push(numbered);
        }
    }
    framed
}

/// Strip indentation and trailing whitespace (including a stray CR).
pub fn trim_line(raw: &str) -> &str {
    raw.trim_matches(|c| c == ' ' || c == '\t' || c == '\r')
}

/// Render one declaration line; the empty string is a bare `§<id>`.
pub fn render_declaration(decl: &Declaration) -> String {
    if decl.text.is_empty() {
        format!("§{}", decl.id)
    } else {
        format!("§{} {}", decl.id, escape(&decl.text))
    }
}

/// Render a full document: declarations, separator, then one assignment per line.
pub fn render<I>(declarations: I, assignments: &[Assignment]) -> String
where
    I: IntoIterator<Item = Declaration>,
{
    let mut out = String::new();
    for decl in declarations {
        out.push_str(&render_declaration(&decl));
        out.push('\n');
    }
    out.push_str(SEPARATOR);
    out.push('\n');
    for assignment in assignments {
        out.push_str(&assignment.to_string());
        out.push('\n');
    }
    out
}
