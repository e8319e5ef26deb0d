//! Tree walk and delta encoding: document tree → PAIN assignments.
//!
//! This module is the encode half of the codec. It traverses a [`Value`] tree
//! depth-first and flattens it into one [`Leaf`] per terminal node, then turns the
//! leaves into id-based [`Assignment`]s with minimal relative paths.
//!
//! ## Traversal order
//!
//! - Mappings are visited in insertion order, arrays in index order.
//! - Arrays add one array-descent step per nesting level and no index: position is
//!   implied by the order in which the decoder sees the elements.
//! - The first leaf inside an element carries `[+]` for that element; every later leaf
//!   inside the same element carries `[]`.
//! - Empty mappings and arrays below the root are leaves of their own (`{}` / `[]`
//!   targets), so they survive a round trip.
//!
//! ## Id assignment
//!
//! | Pass | What gets an id | Order |
//! |------|-----------------|-------|
//! | 1 | every key string along every leaf path | first use |
//! | 2 | every leaf string | first use |
//!
//! Both passes draw from one counter ([`IdAllocator`]), so key ids precede value ids
//! and the same text in both roles gets two ids.
//!
//! ## Deltas
//!
//! Each path is emitted relative to the previous one through
//! [`PathCursor::delta`](crate::resolve::PathCursor::delta): the number of leading dots
//! is how many trailing segments of the previous path to drop.

use crate::ast::{Assignment, Item, Segment, Target};
use crate::declarations::{IdAllocator, Role};
use crate::resolve::PathCursor;
use crate::tree::Step;
use crate::value::{Map, Value};

/// What sits at the end of a leaf path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafValue<'a> {
    Str(&'a str),
    EmptyMap,
    EmptyList,
}

/// One terminal node with its absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf<'a> {
    pub steps: Vec<Step>,
    pub value: LeafValue<'a>,
}

/// Flatten a tree into leaves in traversal order.
pub fn leaves(root: &Map) -> Vec<Leaf<'_>> {
    let mut walker = TreeWalker::default();
    walker.map(root);
    walker.out
}

#[derive(Default)]
struct TreeWalker<'a> {
    stack: Vec<Step>,
    out: Vec<Leaf<'a>>,
}

impl<'a> TreeWalker<'a> {
    fn map(&mut self, map: &'a Map) {
        for (key, child) in map {
            self.stack.push(Step::Key(key.clone()));
            self.node(child);
            self.stack.pop();
        }
    }

    fn node(&mut self, value: &'a Value) {
        match value {
            Value::Str(s) => self.emit(LeafValue::Str(s)),
            Value::Map(m) if m.is_empty() => self.emit(LeafValue::EmptyMap),
            Value::Map(m) => self.map(m),
            Value::List(items) if items.is_empty() => self.emit(LeafValue::EmptyList),
            Value::List(items) => {
                for item in items {
                    self.stack.push(Step::Item(Item::New));
                    self.node(item);
                    self.stack.pop();
                }
            }
        }
    }

    fn emit(&mut self, value: LeafValue<'a>) {
        self.out.push(Leaf {
            steps: self.stack.clone(),
            value,
        });
        // every element on the stack now exists
        for step in &mut self.stack {
            if let Step::Item(item) = step {
                *item = Item::Last;
            }
        }
    }
}

/// Result of encoding a tree: the declarations to print and the body assignments.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub ids: IdAllocator,
    pub assignments: Vec<Assignment>,
}

/// Assign ids (keys first, then values) and compute relative path deltas.
pub fn encode_tree(root: &Map) -> Encoded {
    let leaves = leaves(root);
    let mut ids = IdAllocator::new();

    let paths: Vec<Vec<Segment>> = leaves
        .iter()
        .map(|leaf| {
            leaf.steps
                .iter()
                .map(|step| match step {
                    Step::Key(k) => Segment::Key(ids.get_or_assign(Role::Key, k)),
                    Step::Item(item) => Segment::Item(*item),
                })
                .collect()
        })
        .collect();

    let targets: Vec<Target> = leaves
        .iter()
        .map(|leaf| match leaf.value {
            LeafValue::Str(s) => Target::Value(ids.get_or_assign(Role::Value, s)),
            LeafValue::EmptyMap => Target::EmptyMap,
            LeafValue::EmptyList => Target::EmptyList,
        })
        .collect();

    let mut cursor = PathCursor::new();
    let assignments = paths
        .iter()
        .zip(targets)
        .map(|(path, target)| Assignment {
            path: cursor.delta(path),
            target,
        })
        .collect();

    Encoded { ids, assignments }
}
