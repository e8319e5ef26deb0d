//! Syntax tree for PAIN lines: declarations, path expressions and assignment targets.

use std::fmt;

/// Declaration id (`§<id>`).
pub type Id = u64;

/// One `§<id> <text>` header line, text already unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub id: Id,
    pub text: String,
}

/// Which array element an array-descent step addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    /// `[+]`: push a new element and descend into it.
    New,
    /// `[]`: descend into the last element.
    Last,
}

/// A path segment as written in the body: a declared key, a literal key name or an array marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(Id),
    Name(String),
    Item(Item),
}

impl Segment {
    /// The form kept as cursor context once the assignment has been applied:
    /// a pushed element is now the last one.
    pub fn settled(self) -> Segment {
        match self {
            Segment::Item(Item::New) => Segment::Item(Item::Last),
            other => other,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(id) => write!(f, "§{}", id),
            Segment::Name(name) => f.write_str(name),
            Segment::Item(Item::New) => f.write_str("[+]"),
            Segment::Item(Item::Last) => f.write_str("[]"),
        }
    }
}

/// Left side of an assignment: `dots` leading dots (0 = absolute) and the segments after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    pub dots: usize,
    pub segments: Vec<Segment>,
}

impl PathExpr {
    pub fn absolute(segments: Vec<Segment>) -> Self {
        PathExpr { dots: 0, segments }
    }

    pub fn is_relative(&self) -> bool {
        self.dots > 0
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.dots {
            f.write_str(".")?;
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

/// Right side of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `§<id>`: a declared string leaf.
    Value(Id),
    /// `{}`
    EmptyMap,
    /// `[]`
    EmptyList,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Value(id) => write!(f, "§{}", id),
            Target::EmptyMap => f.write_str("{}"),
            Target::EmptyList => f.write_str("[]"),
        }
    }
}

/// One body line: `<path> = <target>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub path: PathExpr,
    pub target: Target,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.path, self.target)
    }
}
