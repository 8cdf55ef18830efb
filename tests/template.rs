use std::collections::HashMap;

use pretty_assertions::assert_eq;
use rcpu_asm::{fill, AsmError, Template};

#[test]
fn fills_every_line() {
    let templates = ["MOV {P}, {Q}", "ADD {P}, {R}", "PSH {P}"];
    let bindings = HashMap::from([("P", "A"), ("Q", "B"), ("R", "C")]);
    assert_eq!(
        fill(&templates, &bindings).unwrap(),
        vec!["MOV A, B", "ADD A, C", "PSH A"]
    );
}

#[test]
fn unbound_placeholder_is_named() {
    let bindings = HashMap::from([("P", "A")]);
    let err = fill(&["MOV {P}, {X}"], &bindings).unwrap_err();
    assert_eq!(err, AsmError::UnboundPlaceholder { name: "X".into() });
    assert_eq!(err.to_string(), "Unbound placeholder {X}");
}

#[test]
fn unused_bindings_and_plain_lines() {
    let bindings = HashMap::from([("P", "A"), ("UNUSED", "D")]);
    assert_eq!(fill(&["RET", "POP {P}"], &bindings).unwrap(), vec!["RET", "POP A"]);
    assert_eq!(fill::<&str, &str, &str>(&[], &bindings).unwrap(), Vec::<String>::new());
}

#[test]
fn owned_bindings() {
    let mut bindings: HashMap<String, String> = HashMap::new();
    bindings.insert("T".into(), "C".into());
    let lines = vec![String::from("LDV {T}, 5"), String::from("ATH {T}, {T}, 0, 0, 1")];
    assert_eq!(
        fill(&lines, &bindings).unwrap(),
        vec!["LDV C, 5", "ATH C, C, 0, 0, 1"]
    );
}

#[test]
fn placeholder_listing() {
    let t = Template::parse("ATH {P}, {Q}, 0, 0, {P}").unwrap();
    assert_eq!(t.placeholders().collect::<Vec<_>>(), vec!["P", "Q", "P"]);
}
