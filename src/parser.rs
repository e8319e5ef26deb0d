//! Parse single PAIN lines using PEST.

use crate::ast::*;
use crate::declarations::unescape;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct PainParser;

/// Why a body line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// The line is not an assignment at all (no `=`, or an unknown target).
    Malformed(String),
    /// The left side of an assignment is not a path expression.
    Path(String),
    /// A `§<digits>` target whose id does not fit in [`Id`]; no declaration can match it.
    IdOutOfRange(String),
}

/// Parse a header line. `None` when the line is not a declaration; such lines are ignored.
pub fn parse_declaration(line: &str) -> Option<Declaration> {
    let pair = PainParser::parse(Rule::declaration, line).ok()?.next()?;
    let mut id = None;
    let mut text = String::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::id => id = inner.as_str().parse::<Id>().ok(),
            Rule::text => text = unescape(inner.as_str()),
            _ => {}
        }
    }
    Some(Declaration { id: id?, text })
}

/// Parse a body line `<path> = <target>`. Whitespace around `=` is optional.
pub fn parse_assignment(line: &str) -> Result<Assignment, LineError> {
    let (lhs, rhs) = line
        .split_once('=')
        .ok_or_else(|| LineError::Malformed(format!("expected `<path> = <target>`, got `{}`", line)))?;
    let target = parse_target(rhs.trim())?;
    let path = parse_path(lhs.trim()).map_err(LineError::Path)?;
    Ok(Assignment { path, target })
}

/// Parse a path expression such as `§1.[+].§4` or `..§7`.
pub fn parse_path(source: &str) -> Result<PathExpr, String> {
    let pair = PainParser::parse(Rule::path, source)
        .map_err(|_| format!("`{}` is not a path expression", source))?
        .next()
        .ok_or("empty path")?;
    let mut dots = 0;
    let mut segments = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::dots => dots = inner.as_str().len(),
            Rule::key_ref => segments.push(Segment::Key(parse_id(inner)?)),
            Rule::name => segments.push(Segment::Name(inner.as_str().to_string())),
            Rule::new_item => segments.push(Segment::Item(Item::New)),
            Rule::last_item => segments.push(Segment::Item(Item::Last)),
            _ => {}
        }
    }
    Ok(PathExpr { dots, segments })
}

/// Parse the right side of an assignment: `§<id>`, `{}` or `[]`.
pub fn parse_target(source: &str) -> Result<Target, LineError> {
    let pair = PainParser::parse(Rule::target, source)
        .map_err(|_| {
            LineError::Malformed(format!(
                "`{}` is not a target (expected `§<id>`, `{{}}` or `[]`)",
                source
            ))
        })?
        .next()
        .ok_or_else(|| LineError::Malformed("empty target".to_string()))?;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::value_ref => {
                return parse_id(inner)
                    .map(Target::Value)
                    .map_err(LineError::IdOutOfRange)
            }
            Rule::empty_map => return Ok(Target::EmptyMap),
            Rule::empty_list => return Ok(Target::EmptyList),
            _ => {}
        }
    }
    Err(LineError::Malformed(format!("`{}` is not a target", source)))
}

fn parse_id(pair: pest::iterators::Pair<Rule>) -> Result<Id, String> {
    let digits = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::id)
        .ok_or("reference without id")?;
    digits
        .as_str()
        .parse::<Id>()
        .map_err(|_| format!("id `{}` out of range", digits.as_str()))
}
