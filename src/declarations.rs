//! Declaration table: the per-document `§<id>` ↔ string registry.
//!
//! Decoding fills a [`DeclarationTable`] from header lines (last write for an id wins).
//! Encoding assigns ids through [`IdAllocator`]: one counter shared by two lookup pools,
//! so a string used as a key and as a value gets two ids, while repeated uses in the
//! same role reuse one.

use crate::ast::{Declaration, Id};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Decode-side table: id → declared text.
#[derive(Debug, Default, Clone)]
pub struct DeclarationTable {
    entries: HashMap<Id, String>,
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration. Returns the previous text when the id was already declared.
    pub fn declare(&mut self, decl: Declaration) -> Option<String> {
        self.entries.insert(decl.id, decl.text)
    }

    pub fn get(&self, id: Id) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The pool a string is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Key,
    Value,
}

/// Encode-side id assignment in strict first-use order, starting at 1.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Id,
    keys: IndexMap<String, Id>,
    values: IndexMap<String, Id>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        IdAllocator {
            next: 1,
            keys: IndexMap::new(),
            values: IndexMap::new(),
        }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing id for `(role, text)`, or the next counter value.
    pub fn get_or_assign(&mut self, role: Role, text: &str) -> Id {
        let pool = match role {
            Role::Key => &mut self.keys,
            Role::Value => &mut self.values,
        };
        if let Some(&id) = pool.get(text) {
            return id;
        }
        let id = self.next;
        self.next += 1;
        pool.insert(text.to_string(), id);
        id
    }

    /// Key declarations in assignment order, then value declarations in assignment order.
    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.keys
            .iter()
            .chain(self.values.iter())
            .map(|(text, &id)| Declaration { id, text: text.clone() })
    }

    pub fn len(&self) -> usize {
        self.keys.len() + self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Escape declaration text so it fits on one header line and keeps edge spaces.
pub fn escape(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let lead = chars.iter().take_while(|&&c| c == ' ').count();
    let trail = if lead == chars.len() {
        0
    } else {
        chars.iter().rev().take_while(|&&c| c == ' ').count()
    };
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' ' if i < lead || i >= chars.len() - trail => out.push_str("\\s"),
            c => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape`]. Unknown escapes and a trailing backslash are kept as written.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
