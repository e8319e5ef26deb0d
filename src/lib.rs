//! # PAIN: declaration/path-delta notation and its JSON codec
//!
//! PAIN is a line-oriented notation for document trees: a numbered declaration table,
//! a `§` separator line, then one assignment per leaf whose path is written relative
//! to the previous one. This crate decodes PAIN into an ordered tree of objects, arrays
//! and strings, and encodes any such tree back.
//!
//! ## Document structure
//!
//! - **Header**: `§<id> <text>` declarations. Text is escaped (`\n`, `\t`, `\r`, `\\`,
//!   `\s` for edge spaces); a bare `§<id>` declares the empty string.
//! - **Separator**: a line containing only `§`.
//! - **Body**: `<path> = <target>` lines.
//!
//! ## Paths
//!
//! - Segments: `§<id>` (declared key), a literal key name, `[+]` (start a new array
//!   element), `[]` (continue the last array element).
//! - `N` leading dots drop the last `N` segments of the previous absolute path.
//! - Targets: `§<id>` (string leaf), `{}` (empty object), `[]` (empty array).
//!
//! ## Example
//!
//! ```text
//! §1 users
//! §2 name
//! §3 role
//! §4 Alice
//! §5 admin
//! §6 Bob
//! §
//! §1.[+].§2 = §4
//! .§3 = §5
//! ..[+].§2 = §6
//! ```
//!
//! decodes to `{"users": [{"name": "Alice", "role": "admin"}, {"name": "Bob"}]}`.
//!
//! ## Usage
//!
//! [`decode`] and [`encode_json`] cover the common case; [`Codec`] with [`Options`]
//! selects strictness and scalar handling. See `tests/integration.rs` for more.

pub mod ast;
pub mod codec;
pub mod declarations;
pub mod dump;
pub mod frame;
pub mod lint;
pub mod parser;
pub mod resolve;
pub mod tree;
pub mod value;
pub mod walk;

pub use ast::{Assignment, Declaration, Id, Item, PathExpr, Segment, Target};
pub use codec::{AppliedLine, Codec, CodecError, LinePolicy, Options};
pub use declarations::{DeclarationTable, IdAllocator, Role};
pub use value::{Map, ScalarPolicy, Value};

/// Decode PAIN text with default [`Options`].
pub fn decode(pain: &str) -> Result<Value, CodecError> {
    Codec::default().decode(pain)
}

/// Decode PAIN text to pretty-printed JSON with default [`Options`].
pub fn decode_to_json(pain: &str) -> Result<String, CodecError> {
    Codec::default().decode_to_json(pain)
}

/// Encode a tree with default [`Options`].
pub fn encode(tree: &Value) -> Result<String, CodecError> {
    Codec::default().encode(tree)
}

/// Encode JSON text with default [`Options`].
pub fn encode_json(json: &str) -> Result<String, CodecError> {
    Codec::default().encode_json(json)
}
