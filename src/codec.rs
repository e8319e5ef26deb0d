//! Decode/encode PAIN documents.
//!
//! Decode runs framer → declaration table → (per body line) path resolution → tree
//! writer. Encode walks the tree, assigns ids and renders the framed text. Every call
//! owns its own declaration table and cursor; a call either fully succeeds or fails.

use crate::ast::{Assignment, Id, Segment, Target};
use crate::declarations::DeclarationTable;
use crate::frame::{self, NumberedLine};
use crate::parser::{self, LineError};
use crate::resolve::{PathCursor, ResolveError};
use crate::tree::{self, display_steps, Step, TreeError};
use crate::value::{Map, ScalarPolicy, Value};
use crate::walk;
use tracing::{debug, trace, warn};

/// What to do with a body line that matches no grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinePolicy {
    /// Log and continue.
    #[default]
    Skip,
    /// Fail the whole decode with [`CodecError::MalformedLine`].
    Reject,
}

/// Codec configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub malformed_lines: LinePolicy,
    pub scalars: ScalarPolicy,
    /// Fail with [`CodecError::MissingSeparator`] instead of treating the input as all header.
    pub require_separator: bool,
    /// Indent JSON produced by [`Codec::decode_to_json`].
    pub pretty: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            malformed_lines: LinePolicy::Skip,
            scalars: ScalarPolicy::Stringify,
            require_separator: false,
            pretty: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("line {line}: relative path without a previous path")]
    NoPreviousPath { line: usize },
    #[error("line {line}: unresolved reference §{id}")]
    UnresolvedReference { id: Id, line: usize },
    #[error("line {line}: malformed path: {reason}")]
    MalformedPath { line: usize, reason: String },
    #[error("line {line}: malformed line: {reason}")]
    MalformedLine { line: usize, reason: String },
    #[error("line {line}: path conflict at `{path}`: {reason}")]
    PathConflict { line: usize, path: String, reason: String },
    #[error("missing section separator (a line containing only `§`)")]
    MissingSeparator,
    #[error("tree syntax: {0}")]
    TreeSyntax(#[from] serde_json::Error),
    #[error("root must be an object, found {found}")]
    RootNotObject { found: &'static str },
    #[error("unsupported leaf at `{path}`: {kind} has no string form")]
    UnsupportedLeaf { path: String, kind: &'static str },
}

/// One applied body line, as seen by [`Codec::decode_traced`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedLine {
    pub line: usize,
    pub assignment: Assignment,
    pub steps: Vec<Step>,
    pub value: Value,
}

#[derive(Debug, Clone, Default)]
pub struct Codec {
    pub options: Options,
}

impl Codec {
    pub fn new(options: Options) -> Self {
        Codec { options }
    }

    /// Decode PAIN text into a tree whose root is always a mapping.
    pub fn decode(&self, text: &str) -> Result<Value, CodecError> {
        self.decode_with(text, |_| {})
    }

    /// Decode and also return every applied body line with its absolute path.
    pub fn decode_traced(&self, text: &str) -> Result<(Value, Vec<AppliedLine>), CodecError> {
        let mut applied = Vec::new();
        let value = self.decode_with(text, |line| applied.push(line))?;
        Ok((value, applied))
    }

    /// Decode PAIN text into its JSON serialization.
    pub fn decode_to_json(&self, text: &str) -> Result<String, CodecError> {
        let json = self.decode(text)?.to_json();
        let out = if self.options.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        Ok(out)
    }

    fn decode_with<F>(&self, text: &str, mut on_applied: F) -> Result<Value, CodecError>
    where
        F: FnMut(AppliedLine),
    {
        let framed = frame::split(text);
        if framed.separator.is_none() && self.options.require_separator {
            return Err(CodecError::MissingSeparator);
        }

        let mut table = DeclarationTable::new();
        for line in &framed.header {
            match parser::parse_declaration(line.text) {
                Some(decl) => {
                    let id = decl.id;
                    if table.declare(decl).is_some() {
                        warn!(line = line.number, id, "declaration redefined, last one wins");
                    }
                }
                None => trace!(line = line.number, "ignoring non-declaration header line"),
            }
        }
        debug!(
            declarations = table.len(),
            body_lines = framed.body.len(),
            "decoding PAIN document"
        );

        let mut cursor = PathCursor::new();
        let mut root = Map::new();
        for line in &framed.body {
            let Some(assignment) = self.parse_body_line(line)? else {
                continue;
            };
            let absolute = cursor.resolve(&assignment.path).map_err(|e| match e {
                ResolveError::NoPreviousPath => CodecError::NoPreviousPath { line: line.number },
                ResolveError::AscendsPastRoot { dots, depth } => CodecError::MalformedPath {
                    line: line.number,
                    reason: format!("{} dot(s) ascend past the root of a {}-segment path", dots, depth),
                },
            })?;
            let steps = lookup_steps(&table, &absolute, line.number)?;
            let value = lookup_target(&table, assignment.target, line.number)?;
            trace!(line = line.number, path = %display_steps(&steps), "assign");
            tree::insert(&mut root, &steps, value.clone()).map_err(|e| {
                let reason = e.to_string();
                match e {
                    TreeError::Malformed(_) => CodecError::MalformedPath {
                        line: line.number,
                        reason,
                    },
                    TreeError::Conflict { path, .. } => CodecError::PathConflict {
                        line: line.number,
                        path,
                        reason,
                    },
                }
            })?;
            on_applied(AppliedLine {
                line: line.number,
                assignment,
                steps,
                value,
            });
        }
        debug!(keys = root.len(), "decoded PAIN document");
        Ok(Value::Map(root))
    }

    fn parse_body_line(&self, line: &NumberedLine<'_>) -> Result<Option<Assignment>, CodecError> {
        match parser::parse_assignment(line.text) {
            Ok(a) => Ok(Some(a)),
            // an id no declaration can hold fails like an unreadable path, in both policies
            Err(LineError::Path(reason)) | Err(LineError::IdOutOfRange(reason)) => {
                Err(CodecError::MalformedPath {
                    line: line.number,
                    reason,
                })
            }
            Err(LineError::Malformed(reason)) => match self.options.malformed_lines {
                LinePolicy::Skip => {
                    warn!(line = line.number, %reason, "skipping malformed line");
                    Ok(None)
                }
                LinePolicy::Reject => Err(CodecError::MalformedLine {
                    line: line.number,
                    reason,
                }),
            },
        }
    }

    /// Encode a tree. The root must be a mapping.
    pub fn encode(&self, tree: &Value) -> Result<String, CodecError> {
        let root = tree
            .as_map()
            .ok_or(CodecError::RootNotObject { found: tree.kind() })?;
        let encoded = walk::encode_tree(root);
        debug!(
            declarations = encoded.ids.len(),
            assignments = encoded.assignments.len(),
            "encoded PAIN document"
        );
        Ok(frame::render(encoded.ids.declarations(), &encoded.assignments))
    }

    /// Encode the JSON serialization of a tree.
    pub fn encode_json(&self, json_text: &str) -> Result<String, CodecError> {
        let json: serde_json::Value = serde_json::from_str(json_text)?;
        if !json.is_object() {
            return Err(CodecError::RootNotObject {
                found: json_kind(&json),
            });
        }
        let tree = Value::from_json(&json, self.options.scalars).map_err(|e| {
            CodecError::UnsupportedLeaf {
                path: e.path,
                kind: e.kind,
            }
        })?;
        self.encode(&tree)
    }
}

fn lookup_steps(table: &DeclarationTable, path: &[Segment], line: usize) -> Result<Vec<Step>, CodecError> {
    path.iter()
        .map(|seg| match seg {
            Segment::Key(id) => table
                .get(*id)
                .map(|k| Step::Key(k.to_string()))
                .ok_or(CodecError::UnresolvedReference { id: *id, line }),
            Segment::Name(name) => Ok(Step::Key(name.clone())),
            Segment::Item(item) => Ok(Step::Item(*item)),
        })
        .collect()
}

fn lookup_target(table: &DeclarationTable, target: Target, line: usize) -> Result<Value, CodecError> {
    match target {
        Target::Value(id) => table
            .get(id)
            .map(Value::from)
            .ok_or(CodecError::UnresolvedReference { id, line }),
        Target::EmptyMap => Ok(Value::empty_map()),
        Target::EmptyList => Ok(Value::List(Vec::new())),
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_simple_assignment() {
        let tree = Codec::default().decode("§1 name\n§2 Alice\n§\n§1 = §2\n").expect("decode");
        assert_eq!(tree.pointer("name").and_then(Value::as_str), Some("Alice"));
    }

    #[test]
    fn literal_key_names_need_no_declaration() {
        let tree = Codec::default().decode("§1 name\n§2 Alice\n§\nname = §2\n").expect("decode");
        assert_eq!(tree.pointer("name").and_then(Value::as_str), Some("Alice"));
    }

    #[test]
    fn unparsable_left_side_is_malformed_path() {
        let err = Codec::default().decode("§1 v\n§\na..b = §1\n").expect_err("path");
        assert!(matches!(err, CodecError::MalformedPath { line: 3, .. }));
    }

    #[test]
    fn strict_mode_rejects_malformed_lines() {
        let text = "§1 a\n§2 b\n§\n§1:\n§1 = §2\n";
        let lenient = Codec::default().decode(text).expect("skip");
        assert_eq!(lenient.pointer("a").and_then(Value::as_str), Some("b"));
        let strict = Codec::new(Options {
            malformed_lines: LinePolicy::Reject,
            ..Options::default()
        });
        let err = strict.decode(text).expect_err("reject");
        assert!(matches!(err, CodecError::MalformedLine { line: 4, .. }));
    }

    #[test]
    fn missing_separator_policy() {
        let lenient = Codec::default().decode("§1 a\n").expect("all header");
        assert_eq!(lenient, Value::empty_map());
        let strict = Codec::new(Options {
            require_separator: true,
            ..Options::default()
        });
        assert!(matches!(strict.decode("§1 a\n"), Err(CodecError::MissingSeparator)));
    }

    #[test]
    fn conflicts_are_reported_with_line() {
        let text = "§1 a\n§2 b\n§3 v\n§\n§1 = §3\n§1.§2 = §3\n";
        let err = Codec::default().decode(text).expect_err("conflict");
        assert!(matches!(err, CodecError::PathConflict { line: 6, .. }));
    }

    #[test]
    fn encode_rejects_non_object_root() {
        let err = Codec::default().encode_json("[\"a\"]").expect_err("root");
        assert!(matches!(err, CodecError::RootNotObject { found: "array" }));
        let err = Codec::default().encode(&Value::from("x")).expect_err("root");
        assert!(matches!(err, CodecError::RootNotObject { found: "string" }));
    }

    #[test]
    fn encode_rejects_invalid_json() {
        let err = Codec::default().encode_json("{\"a\": ").expect_err("syntax");
        assert!(matches!(err, CodecError::TreeSyntax(_)));
    }

    #[test]
    fn traced_decode_reports_absolute_paths() {
        let text = "§1 xs\n§2 n\n§3 a\n§4 b\n§\n§1.[+].§2 = §3\n..[+].§2 = §4\n";
        let (_, applied) = Codec::default().decode_traced(text).expect("decode");
        let paths: Vec<String> = applied.iter().map(|a| display_steps(&a.steps)).collect();
        assert_eq!(paths, vec!["xs[+].n", "xs[+].n"]);
        assert_eq!(applied[1].line, 7);
    }
}
