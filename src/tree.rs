//! Tree writer: insert one leaf at an absolute path, materializing containers on demand.

use crate::ast::Item;
use crate::value::{Map, Value};
use std::fmt;

/// An absolute path step with the key name already looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key(String),
    Item(Item),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(k) => f.write_str(k),
            Step::Item(Item::New) => f.write_str("[+]"),
            Step::Item(Item::Last) => f.write_str("[]"),
        }
    }
}

/// Render steps as `a.b[+].c` for messages and dumps.
pub fn display_steps(steps: &[Step]) -> String {
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        if i > 0 && matches!(step, Step::Key(_)) {
            out.push('.');
        }
        out.push_str(&step.to_string());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("{0}")]
    Malformed(String),
    #[error("`{path}` is {found}, expected {expected}")]
    Conflict {
        path: String,
        found: &'static str,
        expected: &'static str,
    },
}

/// Insert `leaf` into `root` at `steps`.
///
/// Intermediate keys create mappings or arrays depending on the step that follows;
/// `[+]` pushes a new element and `[]` continues the last one. The final step assigns
/// the leaf, replacing a string or an empty container; a populated container conflicts.
pub fn insert(root: &mut Map, steps: &[Step], leaf: Value) -> Result<(), TreeError> {
    if !steps.iter().any(|s| matches!(s, Step::Key(_))) {
        return Err(TreeError::Malformed("path has no named key".to_string()));
    }
    let (first, rest) = match steps.split_first() {
        Some((Step::Key(k), rest)) => (k, rest),
        _ => {
            return Err(TreeError::Malformed(
                "path must start with a top-level key".to_string(),
            ))
        }
    };
    insert_under_key(root, first, rest, leaf, &steps[..1])
}

fn insert_under_key(
    map: &mut Map,
    key: &str,
    rest: &[Step],
    leaf: Value,
    done: &[Step],
) -> Result<(), TreeError> {
    let Some(next) = rest.first() else {
        if let Some(existing) = map.get(key) {
            replaceable(existing, done)?;
        }
        map.insert(key.to_string(), leaf);
        return Ok(());
    };
    let child = map
        .entry(key.to_string())
        .or_insert_with(|| container_for(next));
    descend(child, rest, leaf, done)
}

fn descend(node: &mut Value, steps: &[Step], leaf: Value, done: &[Step]) -> Result<(), TreeError> {
    let Some((step, rest)) = steps.split_first() else {
        return Ok(());
    };
    let here = &done_with(done, step);
    match step {
        Step::Key(k) => {
            let found = node.kind();
            let map = node.as_map_mut().ok_or_else(|| conflict(done, found, "object"))?;
            insert_under_key(map, k, rest, leaf, here)
        }
        Step::Item(item) => {
            let found = node.kind();
            let list = node.as_list_mut().ok_or_else(|| conflict(done, found, "array"))?;
            let slot = match (item, rest.first()) {
                (Item::New, None) => {
                    list.push(leaf);
                    return Ok(());
                }
                (Item::New, Some(next)) => {
                    list.push(container_for(next));
                    list.last_mut()
                }
                (Item::Last, None) => {
                    let last = list.last_mut().ok_or_else(|| no_element(done))?;
                    replaceable(last, here)?;
                    *last = leaf;
                    return Ok(());
                }
                (Item::Last, Some(_)) => list.last_mut(),
            };
            let slot = slot.ok_or_else(|| no_element(done))?;
            descend(slot, rest, leaf, here)
        }
    }
}

fn done_with(done: &[Step], step: &Step) -> Vec<Step> {
    let mut v = done.to_vec();
    v.push(step.clone());
    v
}

fn container_for(next: &Step) -> Value {
    match next {
        Step::Key(_) => Value::Map(Map::new()),
        Step::Item(_) => Value::List(Vec::new()),
    }
}

/// A final write may replace a string or an empty container, never a populated one.
fn replaceable(existing: &Value, at: &[Step]) -> Result<(), TreeError> {
    match existing {
        Value::Map(m) if !m.is_empty() => Err(conflict(at, "a non-empty object", "a leaf")),
        Value::List(l) if !l.is_empty() => Err(conflict(at, "a non-empty array", "a leaf")),
        _ => Ok(()),
    }
}

fn conflict(at: &[Step], found: &'static str, expected: &'static str) -> TreeError {
    TreeError::Conflict {
        path: display_steps(at),
        found,
        expected,
    }
}

fn no_element(at: &[Step]) -> TreeError {
    TreeError::Malformed(format!("`{}` has no element to continue", display_steps(at)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> Step {
        Step::Key(k.to_string())
    }

    #[test]
    fn nested_objects_are_created() {
        let mut root = Map::new();
        insert(&mut root, &[key("a"), key("b")], "1".into()).expect("insert");
        insert(&mut root, &[key("a"), key("c")], "2".into()).expect("insert");
        let tree = Value::Map(root);
        assert_eq!(tree.pointer("a.b").and_then(Value::as_str), Some("1"));
        assert_eq!(tree.pointer("a.c").and_then(Value::as_str), Some("2"));
    }

    #[test]
    fn new_and_last_items() {
        let mut root = Map::new();
        let new = Step::Item(Item::New);
        let last = Step::Item(Item::Last);
        insert(&mut root, &[key("xs"), new.clone(), key("n")], "a".into()).expect("insert");
        insert(&mut root, &[key("xs"), last, key("m")], "b".into()).expect("insert");
        insert(&mut root, &[key("xs"), new.clone(), key("n")], "c".into()).expect("insert");
        insert(&mut root, &[key("tags"), new.clone()], "t1".into()).expect("insert");
        insert(&mut root, &[key("tags"), new], "t2".into()).expect("insert");
        let tree = Value::Map(root);
        assert_eq!(tree.pointer("xs.0.n").and_then(Value::as_str), Some("a"));
        assert_eq!(tree.pointer("xs.0.m").and_then(Value::as_str), Some("b"));
        assert_eq!(tree.pointer("xs.1.n").and_then(Value::as_str), Some("c"));
        assert_eq!(tree.pointer("tags").and_then(Value::as_list).map(|l| l.len()), Some(2));
    }

    #[test]
    fn only_array_steps_is_malformed() {
        let mut root = Map::new();
        let err = insert(&mut root, &[Step::Item(Item::New)], "x".into()).expect_err("malformed");
        assert!(matches!(err, TreeError::Malformed(_)));
    }

    #[test]
    fn continuing_missing_element_is_malformed() {
        let mut root = Map::new();
        let err = insert(&mut root, &[key("xs"), Step::Item(Item::Last), key("a")], "x".into())
            .expect_err("no element");
        assert!(matches!(err, TreeError::Malformed(_)));
    }

    #[test]
    fn descending_through_a_string_conflicts() {
        let mut root = Map::new();
        insert(&mut root, &[key("a")], "leaf".into()).expect("insert");
        let err = insert(&mut root, &[key("a"), key("b")], "x".into()).expect_err("conflict");
        assert_eq!(
            err,
            TreeError::Conflict { path: "a".to_string(), found: "string", expected: "object" }
        );
    }

    #[test]
    fn leaf_never_replaces_populated_container() {
        let mut root = Map::new();
        insert(&mut root, &[key("a"), key("b")], "1".into()).expect("insert");
        let err = insert(&mut root, &[key("a")], "x".into()).expect_err("conflict");
        assert_eq!(
            err,
            TreeError::Conflict { path: "a".to_string(), found: "a non-empty object", expected: "a leaf" }
        );

        let new = Step::Item(Item::New);
        let last = Step::Item(Item::Last);
        insert(&mut root, &[key("xs"), new, key("n")], "1".into()).expect("insert");
        let err = insert(&mut root, &[key("xs"), last], "x".into()).expect_err("conflict");
        assert!(matches!(err, TreeError::Conflict { ref path, .. } if path == "xs[]"));

        insert(&mut root, &[key("e")], Value::empty_map()).expect("insert");
        insert(&mut root, &[key("e")], "x".into()).expect("empty container is replaceable");
        assert_eq!(root.get("e").and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn last_write_wins_for_leaves() {
        let mut root = Map::new();
        insert(&mut root, &[key("a")], "1".into()).expect("insert");
        insert(&mut root, &[key("a")], "2".into()).expect("insert");
        assert_eq!(root.get("a").and_then(Value::as_str), Some("2"));
    }
}
