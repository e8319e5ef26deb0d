//! Format decoded documents for display: indented tree view and per-line resolution trace.

use crate::codec::AppliedLine;
use crate::tree::display_steps;
use crate::value::Value;

/// Format a value as an indented tree (multi-line for containers).
pub fn value_to_dump(v: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    match v {
        Value::Str(s) => format!("{}{:?}", pad, s),
        Value::Map(m) if m.is_empty() => format!("{}{{}}", pad),
        Value::Map(m) => {
            let mut lines: Vec<String> = vec![format!("{}{{", pad)];
            for (k, val) in m {
                let sub = value_to_dump(val, indent + 1);
                lines.push(format!("{}  {}: {}", pad, k, sub.trim_start()));
            }
            lines.push(format!("{}}}", pad));
            lines.join("\n")
        }
        Value::List(lst) if lst.is_empty() => format!("{}[]", pad),
        Value::List(lst) => {
            let mut lines: Vec<String> = vec![format!("{}[", pad)];
            for (i, item) in lst.iter().enumerate() {
                let sub = value_to_dump(item, indent + 1);
                lines.push(format!("{}  [{}] {}", pad, i, sub.trim_start()));
            }
            lines.push(format!("{}]", pad));
            lines.join("\n")
        }
    }
}

/// First line of [`value_to_dump`], e.g. for a compact listing.
pub fn value_summary_line(v: &Value) -> String {
    let full = value_to_dump(v, 0);
    full.lines().next().map(|s| s.trim().to_string()).unwrap_or_default()
}

/// One line per applied assignment: source line, absolute path with key names, value,
/// and the assignment as written.
pub fn explain(applied: &[AppliedLine]) -> String {
    let width = applied
        .iter()
        .map(|a| a.line.to_string().len())
        .max()
        .unwrap_or(1);
    applied
        .iter()
        .map(|a| {
            format!(
                "{:>width$}: {} = {}    # {}",
                a.line,
                display_steps(&a.steps),
                value_summary_line(&a.value),
                a.assignment,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
