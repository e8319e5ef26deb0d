//! Document tree: ordered mappings, arrays and string leaves.

use indexmap::IndexMap;
use serde_json::Value as Json;

/// Ordered mapping; insertion order drives id assignment on encode.
pub type Map = IndexMap<String, Value>;

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Map(Map),
    List(Vec<Value>),
    Str(String),
}

/// How non-string JSON scalars are treated on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarPolicy {
    /// Numbers and booleans become their JSON text (`1.5`, `true`).
    #[default]
    Stringify,
    /// Only strings are accepted as leaves.
    Reject,
}

/// A JSON leaf that has no string form under the active [`ScalarPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLeaf {
    /// Dotted location of the leaf, e.g. `users[2].age`.
    pub path: String,
    /// JSON kind: `null`, `number` or `boolean`.
    pub kind: &'static str,
}

impl Value {
    pub fn empty_map() -> Self {
        Value::Map(Map::new())
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Short kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Map(_) => "object",
            Value::List(_) => "array",
            Value::Str(_) => "string",
        }
    }

    /// Look up a child by dotted key path (array indices as numbers), for tests and tooling.
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        path.split('.').filter(|p| !p.is_empty()).try_fold(self, |node, part| match node {
            Value::Map(m) => m.get(part),
            Value::List(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Str(_) => None,
        })
    }

    /// Convert from JSON. Numbers and booleans follow `scalars`; `null` is never accepted.
    pub fn from_json(json: &Json, scalars: ScalarPolicy) -> Result<Value, UnsupportedLeaf> {
        from_json_at(json, scalars, &mut String::new())
    }

    pub fn to_json(&self) -> Json {
        match self {
            Value::Map(m) => Json::Object(m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Str(s) => Json::String(s.clone()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

fn from_json_at(json: &Json, scalars: ScalarPolicy, at: &mut String) -> Result<Value, UnsupportedLeaf> {
    match json {
        Json::String(s) => Ok(Value::Str(s.clone())),
        Json::Object(obj) => {
            let mut map = Map::with_capacity(obj.len());
            for (k, v) in obj {
                let len = at.len();
                if !at.is_empty() {
                    at.push('.');
                }
                at.push_str(k);
                let child = from_json_at(v, scalars, at)?;
                at.truncate(len);
                map.insert(k.clone(), child);
            }
            Ok(Value::Map(map))
        }
        Json::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for (i, v) in items.iter().enumerate() {
                let len = at.len();
                at.push_str(&format!("[{}]", i));
                let child = from_json_at(v, scalars, at)?;
                at.truncate(len);
                list.push(child);
            }
            Ok(Value::List(list))
        }
        Json::Number(n) => match scalars {
            ScalarPolicy::Stringify => Ok(Value::Str(n.to_string())),
            ScalarPolicy::Reject => Err(unsupported("number", at)),
        },
        Json::Bool(b) => match scalars {
            ScalarPolicy::Stringify => Ok(Value::Str(b.to_string())),
            ScalarPolicy::Reject => Err(unsupported("boolean", at)),
        },
        Json::Null => Err(unsupported("null", at)),
    }
}

fn unsupported(kind: &'static str, at: &str) -> UnsupportedLeaf {
    UnsupportedLeaf {
        path: if at.is_empty() { "<root>".to_string() } else { at.to_string() },
        kind,
    }
}
