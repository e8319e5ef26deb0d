//! Relative path resolution: dot-run expressions against the last resolved path.
//!
//! `N` leading dots drop the last `N` segments of the previous absolute path before the
//! new segments are appended, so `.d` after `a.b.c` is `a.b.d` and `..d` is `a.d`.
//! The same cursor drives the encoder in reverse through [`PathCursor::delta`].

use crate::ast::{Item, PathExpr, Segment};

/// Why a path expression could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Relative notation before any absolute path was seen.
    NoPreviousPath,
    /// The dot run ascends above the root.
    AscendsPastRoot { dots: usize, depth: usize },
}

/// Call-scoped cursor context holding `lastPath`.
///
/// The stored path is kept in settled form: every `[+]` is recorded as `[]`, since
/// after an assignment the element it pushed is the last one.
#[derive(Debug, Default, Clone)]
pub struct PathCursor {
    last: Option<Vec<Segment>>,
}

impl PathCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `expr` to an absolute path and make it the new `lastPath`.
    pub fn resolve(&mut self, expr: &PathExpr) -> Result<Vec<Segment>, ResolveError> {
        let absolute = if expr.is_relative() {
            let last = self.last.as_ref().ok_or(ResolveError::NoPreviousPath)?;
            if expr.dots > last.len() {
                return Err(ResolveError::AscendsPastRoot {
                    dots: expr.dots,
                    depth: last.len(),
                });
            }
            let keep = last.len() - expr.dots;
            let mut path = Vec::with_capacity(keep + expr.segments.len());
            path.extend_from_slice(&last[..keep]);
            path.extend_from_slice(&expr.segments);
            path
        } else {
            expr.segments.clone()
        };
        self.last = Some(absolute.iter().cloned().map(Segment::settled).collect());
        Ok(absolute)
    }

    /// Shortest expression that resolves to `next` from the current `lastPath`,
    /// then advance the cursor to `next`.
    pub fn delta(&mut self, next: &[Segment]) -> PathExpr {
        let expr = match self.last.as_deref() {
            None => PathExpr::absolute(next.to_vec()),
            Some(last) => {
                let mut common = shared_prefix(last, next);
                if common == last.len() {
                    // next extends last; keep at least one dot so it stays relative
                    common = last.len().saturating_sub(1);
                }
                if common == 0 || common >= next.len() {
                    PathExpr::absolute(next.to_vec())
                } else {
                    PathExpr {
                        dots: last.len() - common,
                        segments: next[common..].to_vec(),
                    }
                }
            }
        };
        self.last = Some(next.iter().cloned().map(Segment::settled).collect());
        expr
    }
}

/// Length of the common prefix. `[+]` never matches: it names a fresh element.
fn shared_prefix(last: &[Segment], next: &[Segment]) -> usize {
    last.iter()
        .zip(next)
        .take_while(|(old, new)| match (old, new) {
            (Segment::Key(a), Segment::Key(b)) => a == b,
            (Segment::Name(a), Segment::Name(b)) => a == b,
            (Segment::Item(_), Segment::Item(Item::Last)) => true,
            _ => false,
        })
        .count()
}
