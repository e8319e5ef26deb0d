//! Line grammar tests: declarations, paths and targets (accept and reject).

use pain::parser::{parse_assignment, parse_declaration, parse_path, parse_target, LineError};
use pain::{Item, Segment, Target};

// ==================== Declarations ====================

#[test]
fn declaration_keeps_inner_spaces() {
    let d = parse_declaration("§7 hello   world").expect("declaration");
    assert_eq!(d.id, 7);
    assert_eq!(d.text, "hello   world");
}

#[test]
fn declaration_tab_separator() {
    let d = parse_declaration("§2\tvalue").expect("declaration");
    assert_eq!(d.text, "value");
}

#[test]
fn declaration_text_may_contain_markers() {
    let d = parse_declaration("§4 a = §5 . [+]").expect("declaration");
    assert_eq!(d.text, "a = §5 . [+]");
}

#[test]
fn declaration_escapes() {
    let d = parse_declaration("§1 \\sline1\\nline2\\t\\\\\\s").expect("declaration");
    assert_eq!(d.text, " line1\nline2\t\\ ");
}

#[test]
fn declaration_rejects() {
    for line in ["", "§", "§x name", "1 name", "§12name", "name §1"] {
        assert!(parse_declaration(line).is_none(), "`{}` should not be a declaration", line);
    }
}

#[test]
fn declaration_huge_id_is_ignored() {
    assert!(parse_declaration("§99999999999999999999999 x").is_none());
}

// ==================== Paths ====================

#[test]
fn path_absolute_references() {
    let p = parse_path("§1.§22.§333").expect("path");
    assert_eq!(p.dots, 0);
    assert_eq!(p.segments, vec![Segment::Key(1), Segment::Key(22), Segment::Key(333)]);
}

#[test]
fn path_dot_runs() {
    for (src, dots) in [(".§1", 1), ("..§1", 2), ("....§1", 4)] {
        assert_eq!(parse_path(src).expect("path").dots, dots, "{}", src);
    }
}

#[test]
fn path_array_markers() {
    let p = parse_path("§1.[+].[].§2.[+]").expect("path");
    assert_eq!(
        p.segments,
        vec![
            Segment::Key(1),
            Segment::Item(Item::New),
            Segment::Item(Item::Last),
            Segment::Key(2),
            Segment::Item(Item::New),
        ]
    );
}

#[test]
fn path_literal_names() {
    let p = parse_path("user-name.first_name.x1").expect("path");
    assert_eq!(
        p.segments,
        vec![
            Segment::Name("user-name".into()),
            Segment::Name("first_name".into()),
            Segment::Name("x1".into()),
        ]
    );
}

#[test]
fn path_rejects() {
    for src in ["", ".", "...", "§1.", "§1..§2", "§", "§a", "[", "[x]", "a b", "§1.[+]x"] {
        assert!(parse_path(src).is_err(), "`{}` should not be a path", src);
    }
}

// ==================== Targets ====================

#[test]
fn targets() {
    assert_eq!(parse_target("§5"), Ok(Target::Value(5)));
    assert_eq!(parse_target("{}"), Ok(Target::EmptyMap));
    assert_eq!(parse_target("[]"), Ok(Target::EmptyList));
}

#[test]
fn target_rejects() {
    for src in ["", "§", "5", "value", "{ }", "[+]", "§1.§2", "§1 §2"] {
        assert!(parse_target(src).is_err(), "`{}` should not be a target", src);
    }
}

// ==================== Assignments ====================

#[test]
fn assignment_spacing_is_free() {
    for line in ["§1=§2", "§1 = §2", "§1   =\t§2"] {
        let a = parse_assignment(line).expect("assignment");
        assert_eq!(a.target, Target::Value(2), "{}", line);
    }
}

#[test]
fn assignment_display_round_trips() {
    for line in ["§1.[+].§2 = §4", "..[+] = {}", ".§3 = []", "name = §2"] {
        let a = parse_assignment(line).expect("assignment");
        assert_eq!(a.to_string(), line);
    }
}

#[test]
fn assignment_errors_are_classified() {
    assert!(matches!(parse_assignment("no equals here"), Err(LineError::Malformed(_))));
    assert!(matches!(parse_assignment("§1 = nope"), Err(LineError::Malformed(_))));
    assert!(matches!(parse_assignment("§1 = §2 = §3"), Err(LineError::Malformed(_))));
    assert!(matches!(parse_assignment("... = §2"), Err(LineError::Path(_))));
}
